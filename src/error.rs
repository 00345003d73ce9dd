use thiserror::Error;

#[derive(Error, Debug)]
pub enum OmniVaultError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("AI呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("AIレスポンスのパースに失敗: {0}")]
    ApiParse(String),

    #[error("アイテムが検出されませんでした。角度や距離を変えて撮り直してください")]
    NoItemsDetected,

    #[error("別の撮影フローが進行中です。完了または破棄してから再実行してください")]
    CaptureInFlight,

    #[error("不正な状態遷移: {from} → {to}")]
    InvalidTransition { from: String, to: String },

    #[error("レビュー対象が存在しません: {0}")]
    ReviewIndex(usize),

    #[error("ストレージエラー: {0}")]
    Storage(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] omnivault_common::Error),

    #[error("CLI実行エラー: {0}")]
    CliExecution(String),
}

pub type Result<T> = std::result::Result<T, OmniVaultError>;
