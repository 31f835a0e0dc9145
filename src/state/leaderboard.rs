// Leaderboard ranking. Pure and recomputed on every fetch; nothing is cached between calls.

use crate::chain::{Account, Address, ScoreReader};
use crate::error::GameError;
use crate::util::cwarn;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreRecord {
    pub player: Address,
    pub score: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankedEntry {
    /// 1-based.
    pub rank: usize,
    pub player: Address,
    pub score: u64,
}

impl RankedEntry {
    pub fn rank_label(&self) -> String {
        match self.rank {
            1 => "🥇".to_string(),
            2 => "🥈".to_string(),
            3 => "🥉".to_string(),
            n => format!("#{}", n),
        }
    }
}

/// Top `k` by score, highest first. Ties keep their input order (`sort_by` is stable).
pub fn rank_top(records: &[ScoreRecord], k: usize) -> Vec<RankedEntry> {
    let mut order: Vec<&ScoreRecord> = records.iter().collect();
    order.sort_by(|a, b| b.score.cmp(&a.score));
    order
        .into_iter()
        .take(k)
        .enumerate()
        .map(|(i, r)| RankedEntry {
            rank: i + 1,
            player: r.player.clone(),
            score: r.score,
        })
        .collect()
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum LeaderboardView {
    #[default]
    Closed,
    Loading,
    Failed {
        error: GameError,
    },
    Empty,
    Ready(Vec<RankedEntry>),
}

impl LeaderboardView {
    pub fn from_fetch(result: Result<Vec<ScoreRecord>, GameError>, k: usize) -> Self {
        match result {
            Ok(records) => {
                let ranked = rank_top(&records, k);
                if ranked.is_empty() {
                    LeaderboardView::Empty
                } else {
                    LeaderboardView::Ready(ranked)
                }
            }
            Err(err) => {
                cwarn(&format!("leaderboard fetch failed: {}", err));
                LeaderboardView::Failed { error: err }
            }
        }
    }
}

/// Text for a failed load: a headline, then the error detail when it adds anything.
pub fn failure_lines(error: &GameError, network_name: &str) -> Vec<String> {
    match error {
        GameError::WrongNetwork { .. } => vec![error.user_message()],
        _ => vec![
            format!("Failed to load. Please ensure you are connected to {}.", network_name),
            error.user_message(),
        ],
    }
}

/// Fetch the raw list and rank it. A wallet sitting on another chain is reported up front.
pub async fn fetch_top<R: ScoreReader>(
    reader: &R,
    account: &Account,
    expected_chain: u64,
    expected_network: &str,
    k: usize,
) -> LeaderboardView {
    if account.on_wrong_chain(expected_chain) {
        return LeaderboardView::from_fetch(
            Err(GameError::WrongNetwork {
                expected: expected_network.to_string(),
            }),
            k,
        );
    }
    LeaderboardView::from_fetch(reader.top_scores().await, k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::future::Future;
    use std::pin::pin;
    use std::task::{Context, Poll, Waker};

    fn rec(byte: u8, score: u64) -> ScoreRecord {
        ScoreRecord {
            player: Address::from_bytes(&[byte; 20]),
            score,
        }
    }

    fn run_ready<F: Future>(fut: F) -> F::Output {
        let mut fut = pin!(fut);
        match fut.as_mut().poll(&mut Context::from_waker(Waker::noop())) {
            Poll::Ready(v) => v,
            Poll::Pending => panic!("mock reader future was not ready"),
        }
    }

    struct MockReader {
        calls: Cell<u32>,
        result: Result<Vec<ScoreRecord>, GameError>,
    }

    impl ScoreReader for MockReader {
        async fn high_score(&self, _player: &Address) -> Result<u64, GameError> {
            Ok(0)
        }

        async fn top_scores(&self) -> Result<Vec<ScoreRecord>, GameError> {
            self.calls.set(self.calls.get() + 1);
            self.result.clone()
        }
    }

    #[test]
    fn ties_keep_input_order() {
        let records = [rec(0xa, 10), rec(0xb, 30), rec(0xc, 30), rec(0xd, 5)];
        let top = rank_top(&records, 2);
        assert_eq!(top.len(), 2);
        assert_eq!((top[0].player.clone(), top[0].score), (rec(0xb, 0).player, 30));
        assert_eq!((top[1].player.clone(), top[1].score), (rec(0xc, 0).player, 30));
        for _ in 0..3 {
            assert_eq!(rank_top(&records, 2), top);
        }
    }

    #[test]
    fn ranks_are_one_based_with_medals() {
        let records: Vec<_> = (1..=5).map(|i| rec(i, i as u64)).collect();
        let labels: Vec<String> = rank_top(&records, 100)
            .iter()
            .map(RankedEntry::rank_label)
            .collect();
        assert_eq!(labels, vec!["🥇", "🥈", "🥉", "#4", "#5"]);
    }

    #[test]
    fn empty_list_is_no_data_not_error() {
        assert_eq!(LeaderboardView::from_fetch(Ok(vec![]), 100), LeaderboardView::Empty);
        assert_eq!(
            LeaderboardView::from_fetch(Err(GameError::GatewayUnavailable("down".into())), 100),
            LeaderboardView::Failed {
                error: GameError::GatewayUnavailable("down".into())
            }
        );
    }

    #[test]
    fn failure_text_is_not_repeated_for_wrong_network() {
        let wrong = GameError::WrongNetwork {
            expected: "Base Sepolia Testnet".to_string(),
        };
        assert_eq!(
            failure_lines(&wrong, "Base Sepolia Testnet"),
            vec!["Failed to load. Please ensure you are connected to Base Sepolia Testnet.".to_string()]
        );
        assert_eq!(
            failure_lines(&GameError::GatewayUnavailable("down".into()), "Base Sepolia Testnet"),
            vec![
                "Failed to load. Please ensure you are connected to Base Sepolia Testnet.".to_string(),
                "Network error: down".to_string(),
            ]
        );
    }

    #[test]
    fn wrong_chain_skips_fetch() {
        let reader = MockReader {
            calls: Cell::new(0),
            result: Ok(vec![rec(1, 1)]),
        };
        let account = Account {
            address: Some(Address::from_bytes(&[1; 20])),
            chain_id: Some(8453),
        };
        let view = run_ready(fetch_top(&reader, &account, 84532, "Base Sepolia Testnet", 100));
        assert_eq!(reader.calls.get(), 0);
        assert_eq!(
            view,
            LeaderboardView::Failed {
                error: GameError::WrongNetwork {
                    expected: "Base Sepolia Testnet".to_string()
                }
            }
        );

        let view = run_ready(fetch_top(&reader, &Account::default(), 84532, "x", 100));
        assert_eq!(reader.calls.get(), 1);
        assert!(matches!(view, LeaderboardView::Ready(ref v) if v.len() == 1));
    }
}
