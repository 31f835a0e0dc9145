use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct GameBoardProps {
    pub cells: u8,
    pub active_cell: Option<u8>,
    pub on_whack: Callback<u8>,
}

/// 3-wide grid of holes; the active one shows the mole.
#[function_component(GameBoard)]
pub fn game_board(props: &GameBoardProps) -> Html {
    let holes = (0..props.cells).map(|idx| {
        let active = props.active_cell == Some(idx);
        let onclick = {
            let cb = props.on_whack.clone();
            Callback::from(move |_: MouseEvent| cb.emit(idx))
        };
        let bg = if active { "#fcd34d" } else { "#451a03" };
        html! {
            <div key={idx as usize} {onclick} style={format!("width:96px; height:96px; border-radius:50%; cursor:pointer; border:4px solid #78350f; position:relative; overflow:hidden; background:{};", bg)}>
                { if active { html!{ <div style="position:absolute; inset:0; display:flex; align-items:center; justify-content:center; font-size:40px;">{"🐹"}</div> } } else { html!{} } }
                <div style="position:absolute; bottom:0; width:100%; height:33%; background:rgba(120,53,15,0.3);"></div>
            </div>
        }
    });
    html! {
        <div style="display:grid; grid-template-columns:repeat(3, 96px); gap:16px; padding:16px; background:#92400e; border-radius:12px;">
            { for holes }
        </div>
    }
}
