//! 追加フローの状態機械
//!
//! Idle → Capturing → Preprocessing → Detecting → Reviewing
//!      → {Saving → Idle | 破棄 → Idle}
//!
//! 検出失敗（通信・パース・検出ゼロ）はレビューに入らずIdleへ戻る。
//! 撮影中の二重開始は拒否する（キャンセル置換ではなく拒否を採用）。
//! レビュー中の編集・除去はここを通し、最後の1件を除去したら
//! バッチごとIdleへ収束する。

use omnivault_common::PendingItem;

use crate::error::{OmniVaultError, Result};

/// フローの状態
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlowState {
    #[default]
    Idle,
    Capturing,
    Preprocessing,
    Detecting,
    Reviewing,
    Saving,
}

impl std::fmt::Display for FlowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FlowState::Idle => "Idle",
            FlowState::Capturing => "Capturing",
            FlowState::Preprocessing => "Preprocessing",
            FlowState::Detecting => "Detecting",
            FlowState::Reviewing => "Reviewing",
            FlowState::Saving => "Saving",
        };
        write!(f, "{}", name)
    }
}

/// 1回の撮影→保存フロー
#[derive(Debug, Default)]
pub struct AddFlow {
    state: FlowState,
    batch: Vec<PendingItem>,
}

impl AddFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn batch(&self) -> &[PendingItem] {
        &self.batch
    }

    fn transition(&mut self, from: FlowState, to: FlowState) -> Result<()> {
        if self.state != from {
            return Err(OmniVaultError::InvalidTransition {
                from: self.state.to_string(),
                to: to.to_string(),
            });
        }
        self.state = to;
        Ok(())
    }

    /// 撮影を開始する。別のフローが進行中なら拒否
    pub fn begin_capture(&mut self) -> Result<()> {
        if self.state != FlowState::Idle {
            return Err(OmniVaultError::CaptureInFlight);
        }
        self.state = FlowState::Capturing;
        Ok(())
    }

    pub fn begin_preprocessing(&mut self) -> Result<()> {
        self.transition(FlowState::Capturing, FlowState::Preprocessing)
    }

    pub fn begin_detecting(&mut self) -> Result<()> {
        self.transition(FlowState::Preprocessing, FlowState::Detecting)
    }

    /// 検出結果を受けてレビューに入る
    ///
    /// 空バッチではレビューに入らずIdleへ戻し、撮り直しを促す
    /// エラーを返す（通信エラーとは区別される）。
    pub fn enter_review(&mut self, batch: Vec<PendingItem>) -> Result<()> {
        if self.state != FlowState::Detecting {
            return Err(OmniVaultError::InvalidTransition {
                from: self.state.to_string(),
                to: FlowState::Reviewing.to_string(),
            });
        }

        if batch.is_empty() {
            self.state = FlowState::Idle;
            return Err(OmniVaultError::NoItemsDetected);
        }

        self.batch = batch;
        self.state = FlowState::Reviewing;
        Ok(())
    }

    /// 検出失敗。部分データを捨ててIdleへ戻す
    pub fn fail_detection(&mut self) {
        self.batch.clear();
        self.state = FlowState::Idle;
    }

    /// レビュー中の1件を差し替える
    pub fn update_item(&mut self, index: usize, item: PendingItem) -> Result<()> {
        if self.state != FlowState::Reviewing {
            return Err(OmniVaultError::InvalidTransition {
                from: self.state.to_string(),
                to: FlowState::Reviewing.to_string(),
            });
        }
        match self.batch.get_mut(index) {
            Some(slot) => {
                *slot = item;
                Ok(())
            }
            None => Err(OmniVaultError::ReviewIndex(index)),
        }
    }

    /// レビュー中の1件を除去する。最後の1件を除去したらIdleへ収束
    pub fn remove_item(&mut self, index: usize) -> Result<()> {
        if self.state != FlowState::Reviewing {
            return Err(OmniVaultError::InvalidTransition {
                from: self.state.to_string(),
                to: FlowState::Reviewing.to_string(),
            });
        }
        if index >= self.batch.len() {
            return Err(OmniVaultError::ReviewIndex(index));
        }

        self.batch.remove(index);
        if self.batch.is_empty() {
            self.state = FlowState::Idle;
        }
        Ok(())
    }

    /// 保存フェーズへ移り、バッチの所有権を呼び出し側へ渡す
    pub fn begin_saving(&mut self) -> Result<Vec<PendingItem>> {
        self.transition(FlowState::Reviewing, FlowState::Saving)?;
        Ok(std::mem::take(&mut self.batch))
    }

    /// 保存完了（または失敗をユーザーへ提示済み）。Idleへ戻す
    pub fn finish(&mut self) {
        self.batch.clear();
        self.state = FlowState::Idle;
    }

    /// 途中キャンセル・レビュー破棄。どの状態からでもIdleへ
    ///
    /// 部分的にレビューされたレコードがストアへ届くことはない。
    pub fn discard(&mut self) {
        self.batch.clear();
        self.state = FlowState::Idle;
    }
}
