use super::{
    controls_panel::ControlsPanel, game_board::GameBoard, game_over_overlay::GameOverOverlay,
    leaderboard_modal::LeaderboardModal, stats_panel::StatsPanel, top_bar::TopBar,
};
use crate::chain::{Account, Address, InjectedWallet, RpcClient, ScoreReader};
use crate::config::GameConfig;
use crate::model::{GameEvent, SessionAction, Session, SessionStatus};
use crate::state::leaderboard::fetch_top;
use crate::state::submission::drive;
use crate::state::{LeaderboardView, Spawner, SubmissionEffect, SubmissionFlow, SubmissionMsg};
use crate::util::{cerr, clog, cwarn};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[function_component(App)]
pub fn app() -> Html {
    let config = use_memo((), |_| GameConfig::load());
    let session = {
        let config = config.clone();
        use_reducer(move || Session::new(config.max_misses, config.grid_cells))
    };
    let account = use_state(Account::default);
    let high_score = use_state(|| None::<u64>);
    let feedback = use_state(|| None::<String>);
    let show_game_over = use_state(|| false);
    // The flow is mutated synchronously so a double click cannot open two attempts;
    // `flow_view` is the render snapshot.
    let flow = use_mut_ref(SubmissionFlow::default);
    let flow_view = use_state(SubmissionFlow::default);
    let leaderboard = use_state(LeaderboardView::default);
    let fetch_ticket = use_mut_ref(|| 0_u32);

    // Pick up an already-authorized wallet on load, then follow account/chain switches
    {
        let config = config.clone();
        let account = account.clone();
        use_effect_with((), move |_| {
            let watch = match InjectedWallet::detect(&config) {
                Ok(wallet) => {
                    let sync = {
                        let wallet = wallet.clone();
                        move || {
                            let wallet = wallet.clone();
                            let account = account.clone();
                            spawn_local(async move {
                                match wallet.current_account().await {
                                    Ok(a) => account.set(a),
                                    Err(e) => cwarn(&format!("wallet: eth_accounts failed: {}", e)),
                                }
                            });
                        }
                    };
                    sync();
                    match wallet.watch_account(sync) {
                        Ok(w) => Some(w),
                        Err(e) => {
                            cwarn(&format!("wallet: cannot watch account changes: {}", e));
                            None
                        }
                    }
                }
                Err(_) => {
                    clog("wallet: no injected provider");
                    None
                }
            };
            move || drop(watch)
        });
    }

    // Spawner follows the session: running for (status, run_id), stopped otherwise
    {
        let dispatcher = session.dispatcher();
        let config = config.clone();
        use_effect_with(
            (session.status, session.run_id),
            move |&(status, run_id)| {
                let mut spawner = Spawner::default();
                if status == SessionStatus::Running {
                    let emit = Callback::from(move |tick| dispatcher.dispatch(SessionAction::Tick(tick)));
                    spawner.start(run_id, config.tick_ms, config.grid_cells, emit);
                    clog(&format!("spawner start run_id={} period_ms={}", run_id, config.tick_ms));
                }
                move || {
                    if spawner.is_active() {
                        spawner.stop();
                        clog(&format!("spawner stop run_id={}", run_id));
                    }
                }
            },
        );
    }

    // A new run clears the previous run's submission outcome
    {
        let flow = flow.clone();
        let flow_view = flow_view.clone();
        use_effect_with(session.run_id, move |&run_id| {
            flow.borrow_mut().begin_run(run_id);
            flow_view.set(flow.borrow().clone());
            || ()
        });
    }

    // Game over notice, once per run
    {
        let show_game_over = show_game_over.clone();
        use_effect_with(session.last_event, move |ev| {
            if let Some(GameEvent::GameOver { run_id, score }) = ev {
                clog(&format!("game over shown run_id={} score={}", run_id, score));
                show_game_over.set(true);
            }
            || ()
        });
    }

    let refresh_high_score = {
        let config = config.clone();
        let high_score = high_score.clone();
        Callback::from(move |player: Address| {
            let rpc = match RpcClient::new(&config) {
                Ok(rpc) => rpc,
                Err(e) => {
                    cerr(&format!("high_score: bad config: {}", e));
                    return;
                }
            };
            let high_score = high_score.clone();
            spawn_local(async move {
                match rpc.high_score(&player).await {
                    Ok(v) => high_score.set(Some(v)),
                    Err(e) => cwarn(&format!("high_score fetch failed player={} err={}", player.short(), e)),
                }
            });
        })
    };

    {
        let refresh = refresh_high_score.clone();
        let high_score = high_score.clone();
        use_effect_with(account.address.clone(), move |addr| {
            match addr {
                Some(a) => refresh.emit(a.clone()),
                None => high_score.set(None),
            }
            || ()
        });
    }

    let on_connect = {
        let config = config.clone();
        let account = account.clone();
        let feedback = feedback.clone();
        Callback::from(move |_| {
            let wallet = match InjectedWallet::detect(&config) {
                Ok(w) => w,
                Err(_) => {
                    feedback.set(Some("No browser wallet detected.".to_string()));
                    return;
                }
            };
            let account = account.clone();
            let feedback = feedback.clone();
            spawn_local(async move {
                match wallet.connect().await {
                    Ok(a) => {
                        account.set(a);
                        feedback.set(None);
                    }
                    Err(e) => feedback.set(Some(e.user_message())),
                }
            });
        })
    };

    let on_start = {
        let session = session.clone();
        let account = account.clone();
        let feedback = feedback.clone();
        let show_game_over = show_game_over.clone();
        Callback::from(move |_| {
            if let Err(e) = account.require() {
                feedback.set(Some(e.user_message()));
                return;
            }
            feedback.set(None);
            show_game_over.set(false);
            session.dispatch(SessionAction::Start((*account).clone()));
        })
    };

    let on_whack = {
        let dispatcher = session.dispatcher();
        Callback::from(move |cell: u8| dispatcher.dispatch(SessionAction::Hit { cell }))
    };

    let on_submit = {
        let config = config.clone();
        let session = session.clone();
        let account = account.clone();
        let feedback = feedback.clone();
        let flow = flow.clone();
        let flow_view = flow_view.clone();
        let refresh = refresh_high_score.clone();
        Callback::from(move |_| {
            let result = flow.borrow_mut().submit(&session);
            let request = match result {
                Ok(r) => r,
                Err(e) => {
                    if e.is_reportable() {
                        feedback.set(Some(e.user_message()));
                    } else {
                        clog(&format!("submission ignored: {}", e));
                    }
                    return;
                }
            };
            flow_view.set(flow.borrow().clone());
            feedback.set(None);
            clog(&format!(
                "submission start attempt={} score={}",
                request.attempt, request.score
            ));
            let report = {
                let flow = flow.clone();
                let flow_view = flow_view.clone();
                let refresh = refresh.clone();
                let player = account.address.clone();
                move |msg: SubmissionMsg| {
                    let effect = flow.borrow_mut().apply(msg);
                    flow_view.set(flow.borrow().clone());
                    if effect == Some(SubmissionEffect::RefreshHighScore) {
                        if let Some(p) = &player {
                            refresh.emit(p.clone());
                        }
                    }
                }
            };
            let wallet = InjectedWallet::detect(&config);
            spawn_local(async move {
                match wallet {
                    Ok(w) => drive(&w, request, report).await,
                    Err(error) => report(SubmissionMsg::Failed {
                        attempt: request.attempt,
                        error,
                    }),
                }
            });
        })
    };

    let open_leaderboard = {
        let config = config.clone();
        let account = account.clone();
        let leaderboard = leaderboard.clone();
        let fetch_ticket = fetch_ticket.clone();
        Callback::from(move |_| {
            let ticket = {
                let mut t = fetch_ticket.borrow_mut();
                *t = t.wrapping_add(1);
                *t
            };
            leaderboard.set(LeaderboardView::Loading);
            let config = config.clone();
            let account = (*account).clone();
            let leaderboard = leaderboard.clone();
            let fetch_ticket = fetch_ticket.clone();
            spawn_local(async move {
                let view = match RpcClient::new(&config) {
                    Ok(rpc) => {
                        fetch_top(
                            &rpc,
                            &account,
                            config.chain_id,
                            config.network_name(),
                            config.leaderboard_limit,
                        )
                        .await
                    }
                    Err(e) => LeaderboardView::from_fetch(Err(e), config.leaderboard_limit),
                };
                // a newer open/close superseded this fetch
                if *fetch_ticket.borrow() == ticket {
                    leaderboard.set(view);
                }
            });
        })
    };

    let close_leaderboard = {
        let leaderboard = leaderboard.clone();
        let fetch_ticket = fetch_ticket.clone();
        Callback::from(move |_| {
            let mut t = fetch_ticket.borrow_mut();
            *t = t.wrapping_add(1);
            leaderboard.set(LeaderboardView::Closed);
        })
    };

    let dismiss_game_over = {
        let show_game_over = show_game_over.clone();
        Callback::from(move |_| show_game_over.set(false))
    };

    let tx_url = flow_view
        .tx_hash
        .as_ref()
        .filter(|_| flow_view.is_for_run(session.run_id))
        .map(|h| config.tx_url(&h.0));

    html! {
        <main style="display:flex; min-height:100vh; flex-direction:column; align-items:center; justify-content:space-between; gap:32px; padding:32px; background:#f5f5f4;">
            <TopBar
                account={(*account).clone()}
                on_connect={on_connect}
                on_open_leaderboard={open_leaderboard.clone()}
            />
            <div style="display:flex; flex-direction:column; align-items:center; gap:32px;">
                <StatsPanel
                    score={session.score}
                    missed={session.missed_count}
                    max_misses={session.max_misses}
                    high_score={*high_score}
                />
                <GameBoard cells={session.grid_cells} active_cell={session.active_cell} on_whack={on_whack} />
                <ControlsPanel
                    running={session.is_running()}
                    connected={account.is_connected()}
                    score={session.score}
                    run_id={session.run_id}
                    submission={(*flow_view).clone()}
                    tx_url={tx_url}
                    feedback={(*feedback).clone()}
                    on_start={on_start}
                    on_submit={on_submit}
                />
            </div>
            <div style="text-align:center; color:#6b7280; font-size:14px;">
                { format!("Connect your wallet to play on {}", config.network_name()) }
            </div>
            <GameOverOverlay
                show={*show_game_over && session.status == SessionStatus::Ended}
                final_score={session.score}
                max_misses={session.max_misses}
                dismiss={dismiss_game_over}
            />
            <LeaderboardModal
                view={(*leaderboard).clone()}
                network_name={config.network_name()}
                limit={config.leaderboard_limit}
                on_close={close_leaderboard}
                on_retry={open_leaderboard}
            />
        </main>
    }
}
