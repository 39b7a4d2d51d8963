//! Win-size classification, marks and stake payout.

use serde::Serialize;

/// How big a game win was, for marks and history reporting.
///
/// 120 points is a bandeira (flag), 91-119 a capote (rout), anything
/// else a plain win.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WinKind {
    Bandeira,
    Capote,
    Plain,
}

impl WinKind {
    pub fn classify(winner_points: u8) -> WinKind {
        match winner_points {
            120 => WinKind::Bandeira,
            91..=119 => WinKind::Capote,
            _ => WinKind::Plain,
        }
    }
}

/// Marks (riscas) a game win is worth towards the 4 that end a match.
///
/// Bandeira jumps straight to 4 regardless of the winner's prior count.
pub fn marks_for_points(winner_points: u8) -> u8 {
    match winner_points {
        120 => 4,
        91..=119 => 2,
        61..=90 => 1,
        _ => 0,
    }
}

/// Winner's coin payout: both stakes minus one commission unit.
pub fn payout(stake: u32) -> u32 {
    stake * 2 - 1
}
