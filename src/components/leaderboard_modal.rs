use crate::state::LeaderboardView;
use crate::state::leaderboard::failure_lines;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct LeaderboardModalProps {
    pub view: LeaderboardView,
    pub network_name: &'static str,
    pub limit: usize,
    pub on_close: Callback<()>,
    pub on_retry: Callback<()>,
}

#[function_component]
pub fn LeaderboardModal(props: &LeaderboardModalProps) -> Html {
    if props.view == LeaderboardView::Closed {
        return html! {};
    }

    let close_cb = {
        let cb = props.on_close.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let retry_cb = {
        let cb = props.on_retry.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let centered = "padding:32px; text-align:center;";

    let body = match &props.view {
        LeaderboardView::Closed => html! {},
        LeaderboardView::Loading => html! { <div style={format!("{} color:#6b7280;", centered)}>{"Loading..."}</div> },
        LeaderboardView::Failed { error } => {
            let lines = failure_lines(error, props.network_name);
            html! {
                <div style={format!("{} color:#ef4444; display:flex; flex-direction:column; gap:10px; align-items:center;", centered)}>
                    { for lines.iter().enumerate().map(|(i, line)| if i == 0 {
                        html!{ <span>{ line.clone() }</span> }
                    } else {
                        html!{ <span style="font-size:11px; opacity:0.8;">{ line.clone() }</span> }
                    }) }
                    <button onclick={retry_cb}>{"Retry"}</button>
                </div>
            }
        }
        LeaderboardView::Empty => html! { <div style={format!("{} color:#6b7280;", centered)}>{"No data yet. Be the first!"}</div> },
        LeaderboardView::Ready(entries) => html! {
            <table style="width:100%; text-align:left; border-collapse:collapse;">
                <thead style="background:#f9fafb; position:sticky; top:0;">
                    <tr>
                        <th style="padding:12px;">{"Rank"}</th>
                        <th style="padding:12px;">{"Player"}</th>
                        <th style="padding:12px; text-align:right;">{"Score"}</th>
                    </tr>
                </thead>
                <tbody>
                    { for entries.iter().map(|e| html! {
                        <tr key={format!("{}-{}", e.player, e.rank)} style="border-bottom:1px solid #f3f4f6;">
                            <td style="padding:12px; font-family:monospace; width:64px;">{ e.rank_label() }</td>
                            <td style="padding:12px; font-family:monospace; color:#2563eb;" title={e.player.to_string()}>{ e.player.short() }</td>
                            <td style="padding:12px; text-align:right; font-weight:700;">{ e.score }</td>
                        </tr>
                    }) }
                </tbody>
            </table>
        },
    };

    html! {<div style="position:fixed; inset:0; display:flex; align-items:center; justify-content:center; background:rgba(0,0,0,0.5); z-index:50; padding:16px;">
        <div style="background:#fff; color:#1f2937; border-radius:16px; width:100%; max-width:448px; max-height:80vh; display:flex; flex-direction:column; overflow:hidden;">
            <div style="display:flex; justify-content:space-between; align-items:center; padding:20px 24px; background:#fefce8; border-bottom:1px solid #f3f4f6;">
                <h3 style="margin:0; font-size:22px; color:#854d0e;">{ format!("🏆 Top {}", props.limit) }</h3>
                <button onclick={close_cb} style="padding:4px 10px;">{"✕"}</button>
            </div>
            <div style="overflow-y:auto; flex:1;">{ body }</div>
            <div style="padding:12px; background:#f9fafb; text-align:center; font-size:11px; color:#9ca3af; border-top:1px solid #f3f4f6;">
                { format!("Data loaded directly from {} contract", props.network_name) }
            </div>
        </div>
    </div>}
}
