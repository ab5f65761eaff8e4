//! 進捗表示
//!
//! `--quiet` やテストでは非表示の `Progress` を使い、呼び出し側の分岐をなくす。

use indicatif::{ProgressBar, ProgressStyle};

pub struct Progress {
    bar: Option<ProgressBar>,
}

impl Progress {
    /// 何も表示しない
    pub fn hidden() -> Self {
        Self { bar: None }
    }

    pub fn bar(total: u64, message: &str, enabled: bool) -> Self {
        if !enabled {
            return Self::hidden();
        }

        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_message(message.to_string());
        Self { bar: Some(bar) }
    }

    pub fn inc(&self, delta: u64) {
        if let Some(bar) = &self.bar {
            bar.inc(delta);
        }
    }

    pub fn finish_clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    pub fn finish_err(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.abandon_with_message(message.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_progress_is_noop() {
        let progress = Progress::bar(10, "登録中", false);
        assert!(progress.bar.is_none());
        progress.inc(1);
        progress.finish_clear();
    }
}
