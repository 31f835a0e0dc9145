use crate::util::lives_display;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct StatsPanelProps {
    pub score: u32,
    pub missed: u32,
    pub max_misses: u32,
    /// `None` until the connected account's high score has been read.
    pub high_score: Option<u64>,
}

#[function_component]
pub fn StatsPanel(props: &StatsPanelProps) -> Html {
    let row_style = "display:flex; align-items:center; gap:8px;"; // label | value
    let label_style = "font-weight:500;";
    let value_style = "font-variant-numeric:tabular-nums; font-weight:700;";
    html! {
        <div style="display:flex; gap:32px; font-size:20px; background:#fff; color:#1f2937; padding:16px 24px; border-radius:12px; box-shadow:0 6px 18px rgba(0,0,0,0.15);">
            <div style={row_style}>
                <span style={label_style}>{"Score:"}</span>
                <span style={format!("{} color:#16a34a;", value_style)}>{ props.score }</span>
            </div>
            <div style={row_style}>
                <span style={label_style}>{"Lives:"}</span>
                <span style={format!("{} color:#dc2626;", value_style)}>{ lives_display(props.max_misses, props.missed) }</span>
            </div>
            <div style={row_style}>
                <span style={label_style}>{"High Score:"}</span>
                <span style={format!("{} color:#2563eb;", value_style)}>{ props.high_score.unwrap_or(0) }</span>
            </div>
        </div>
    }
}
