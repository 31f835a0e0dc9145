use crate::state::{SubmissionFlow, SubmissionState};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ControlsPanelProps {
    pub running: bool,
    pub connected: bool,
    /// Score of the last finished (or current) run.
    pub score: u32,
    pub run_id: u32,
    pub submission: SubmissionFlow,
    /// Explorer link for the submission's transaction, once signed.
    pub tx_url: Option<String>,
    pub feedback: Option<String>,
    pub on_start: Callback<()>,
    pub on_submit: Callback<()>,
}

#[function_component]
pub fn ControlsPanel(props: &ControlsPanelProps) -> Html {
    let start_cb = {
        let cb = props.on_start.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let submit_cb = {
        let cb = props.on_submit.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let start_or_status = if props.running {
        html! { <div style="font-size:20px; font-weight:700; color:#ea580c;">{"Game in progress... Go!"}</div> }
    } else {
        let label = if props.score > 0 { "Play Again" } else { "Start Game" };
        html! { <button onclick={start_cb} disabled={!props.connected} style="padding:16px 32px; font-size:20px; font-weight:700;">{ label }</button> }
    };
    let submit_section = if !props.running && props.score > 0 {
        let sub = &props.submission;
        // outcome of an older run is not this score's outcome
        let own_run = sub.is_for_run(props.run_id);
        let status = match sub.state {
            _ if !own_run => None,
            SubmissionState::Confirmed => Some("Score submitted successfully!".to_string()),
            SubmissionState::Failed => sub.error.as_ref().map(|e| e.user_message()),
            _ => None,
        };
        html! {
            <div style="display:flex; flex-direction:column; align-items:center; gap:8px;">
                <button onclick={submit_cb} disabled={sub.in_flight()} style="padding:12px 32px; font-weight:700;">{ sub.button_label() }</button>
                { if let (Some(url), Some(hash), true) = (&props.tx_url, &sub.tx_hash, own_run) {
                    html!{ <a href={url.clone()} target="_blank" rel="noopener noreferrer" style="font-size:12px; color:#3b82f6;">{ format!("View Transaction: {}", hash.short()) }</a> }
                } else { html!{} } }
                { if let Some(s) = status { html!{ <div style="font-size:12px;">{ s }</div> } } else { html!{} } }
            </div>
        }
    } else {
        html! {}
    };
    html! {<div style="display:flex; flex-direction:column; align-items:center; gap:16px;">
        { start_or_status }
        { submit_section }
        { if let Some(txt) = &props.feedback { if !txt.is_empty() { html!{ <div style="font-size:12px; line-height:1.2; background:#fef3c7; border:1px solid #f59e0b; padding:4px 8px; border-radius:6px;">{ txt.clone() }</div> } } else { html!{} } } else { html!{} } }
    </div>}
}
