// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rolling commit-loop statistics.

use alloc::string::String;

use lamina_core::trace::{RefreshTickEvent, SwapCommitEvent, TraceSink};

/// Rolling tracker over commit-loop trace events, with fixed-size
/// commits-per-refresh history.
///
/// Attach it as the sink of a
/// [`Tracer`](lamina_core::trace::Tracer) and read the history after
/// driving refresh events.
#[derive(Debug)]
pub struct CommitTracker<const N: usize> {
    commits_per_tick: [u32; N],
    cursor: usize,
    total_ticks: u64,
    total_commits: u64,
    last_commit: Option<SwapCommitEvent>,
}

impl<const N: usize> Default for CommitTracker<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> CommitTracker<N> {
    /// Creates an empty tracker.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            commits_per_tick: [0; N],
            cursor: 0,
            total_ticks: 0,
            total_commits: 0,
            last_commit: None,
        }
    }

    /// Total refresh ticks observed.
    #[must_use]
    pub const fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    /// Total swaps committed across all observed ticks.
    #[must_use]
    pub const fn total_commits(&self) -> u64 {
        self.total_commits
    }

    /// The most recent commit event, if any.
    #[must_use]
    pub const fn last_commit(&self) -> Option<SwapCommitEvent> {
        self.last_commit
    }

    /// Returns ring-buffer commits-per-tick oldest→newest.
    #[must_use]
    pub fn history(&self) -> [u32; N] {
        let mut out = [0; N];
        let mut i = 0;
        while i < N {
            out[i] = self.commits_per_tick[(self.cursor + i) % N];
            i += 1;
        }
        out
    }

    /// Returns an ASCII sparkline over `history()`, one glyph per tick.
    #[must_use]
    pub fn sparkline_ascii(&self, max_commits: u32) -> String {
        const LEVELS: &[u8] = b" .:-=+*#%@";
        let max = max_commits.max(1);
        let mut out = String::with_capacity(N);
        let mut i = 0;
        while i < N {
            let v = self.commits_per_tick[(self.cursor + i) % N].min(max);
            let level = (v as usize * (LEVELS.len() - 1)) / max as usize;
            out.push(LEVELS[level] as char);
            i += 1;
        }
        out
    }
}

impl<const N: usize> TraceSink for CommitTracker<N> {
    fn refresh_tick(&mut self, event: RefreshTickEvent) {
        // event.commits is cumulative; the tick's own count is the delta.
        let delta = event.commits.saturating_sub(self.total_commits);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "one tick commits at most one swap per layer"
        )]
        let delta = delta as u32;
        self.commits_per_tick[self.cursor % N] = delta;
        self.cursor = (self.cursor + 1) % N;
        self.total_ticks = self.total_ticks.saturating_add(1);
        self.total_commits = event.commits;
    }

    fn swap_committed(&mut self, event: SwapCommitEvent) {
        self.last_commit = Some(event);
    }
}
