use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct GameOverOverlayProps {
    pub show: bool,
    pub final_score: u32,
    pub max_misses: u32,
    pub dismiss: Callback<()>,
}

#[function_component]
pub fn GameOverOverlay(props: &GameOverOverlayProps) -> Html {
    if !props.show {
        return html! {};
    }
    let dismiss_cb = props.dismiss.clone();
    let dismiss_btn = Callback::from(move |_| dismiss_cb.emit(()));
    html! {
        <div style="position:fixed; top:50%; left:50%; transform:translate(-50%, -50%); background:rgba(0,0,0,0.85); color:#fff; border:2px solid #f85149; padding:24px 32px; border-radius:12px; text-align:center; min-width:320px; z-index:40;">
            <h2 style="margin:0 0 12px 0; color:#f85149;">{"Game Over"}</h2>
            <p style="margin:4px 0;">{ format!("You missed {} moles.", props.max_misses) }</p>
            <p style="margin:4px 0;">{ format!("Final Score: {}", props.final_score) }</p>
            <div style="margin-top:16px; display:flex; gap:12px; justify-content:center;">
                <button onclick={dismiss_btn}>{"OK"}</button>
            </div>
        </div>
    }
}
