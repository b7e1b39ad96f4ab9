//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{PathError, RegistryError, ValidationError};

/// ルーム参加の失敗
#[derive(Debug, Error)]
pub enum JoinError {
    /// 接続パスが /chat/{roomId} 形式ではない
    #[error(transparent)]
    InvalidPath(#[from] PathError),

    /// Registry が参加を拒否した
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// 接続通知のシリアライズに失敗した
    #[error("failed to encode connected message: {0}")]
    Encode(#[source] serde_json::Error),
}

/// メッセージ中継の失敗
#[derive(Debug, Error)]
pub enum RelayError {
    /// ペイロードが想定した JSON の形ではない
    #[error("malformed message: {0}")]
    Malformed(#[source] serde_json::Error),

    /// ペイロードが検証ルールを満たさない
    #[error("invalid message: {0}")]
    Invalid(#[from] ValidationError),

    /// 応答エンベロープのシリアライズに失敗した
    #[error("failed to encode response: {0}")]
    Encode(#[source] serde_json::Error),
}
