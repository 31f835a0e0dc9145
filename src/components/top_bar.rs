use crate::chain::Account;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct TopBarProps {
    pub account: Account,
    pub on_connect: Callback<()>,
    pub on_open_leaderboard: Callback<()>,
}

#[function_component(TopBar)]
pub fn top_bar(props: &TopBarProps) -> Html {
    let connect_cb = {
        let cb = props.on_connect.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let leaderboard_cb = {
        let cb = props.on_open_leaderboard.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let wallet = match &props.account.address {
        Some(addr) => html! { <span style="font-family:monospace; padding:8px 12px; background:#fff; border-radius:12px;">{ addr.short() }</span> },
        None => html! { <button onclick={connect_cb}>{"Connect Wallet"}</button> },
    };
    html! {<div id="top-bar" style="width:100%; max-width:1024px; display:flex; align-items:center; justify-content:space-between; gap:12px;">
        <h1 style="margin:0; font-size:36px; color:#ea580c;">{"Web3 Whack-A-Mole 🐹"}</h1>
        <div style="display:flex; align-items:center; gap:8px;">
            <button onclick={leaderboard_cb} style="padding:8px 16px; border-radius:999px; background:#eab308; color:#fff; font-weight:700;">{"🏆 Leaderboard"}</button>
            { wallet }
        </div>
    </div>}
}
