//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 接続パスからのルーム ID 抽出、Registry への登録、接続通知の送信
//!
//! ### なぜこのテストが必要か
//! - 不正なパスでは Registry に何も登録されないことを保証
//! - 参加した本人にだけ CONNECTED 通知が届くことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：/chat/{roomId} での参加
//! - 異常系：不正なパス、Registry による拒否

use std::sync::Arc;

use roomrelay_shared::time::now_rfc3339;

use crate::{
    domain::{Connection, RoomId, RoomRegistry},
    infrastructure::dto::websocket::ConnectedMessage,
};

use super::error::JoinError;

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    /// Registry（所属管理の抽象化）
    registry: Arc<dyn RoomRegistry>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// ルーム参加を実行
    ///
    /// # Arguments
    ///
    /// * `path` - 接続時のリクエストパス（例: `/chat/42`）
    /// * `connection` - 参加する接続
    ///
    /// # Returns
    ///
    /// * `Ok(RoomId)` - 参加したルーム
    /// * `Err(JoinError)` - 参加失敗（Registry は変更されない）
    pub async fn execute(
        &self,
        path: &str,
        connection: Arc<Connection>,
    ) -> Result<RoomId, JoinError> {
        // 1. パスからルーム ID を抽出
        let room = RoomId::from_path(path)?;

        // 2. 接続通知を先に組み立てる（失敗時に Registry を汚さないため）
        let ack = ConnectedMessage::new(&room, now_rfc3339());
        let ack_json = serde_json::to_string(&ack).map_err(JoinError::Encode)?;

        // 3. Registry に登録
        self.registry
            .join(room.clone(), Arc::clone(&connection))
            .await?;

        // 4. 本人にだけ接続通知を送信
        if let Err(e) = connection.send_text(ack_json) {
            tracing::warn!(
                connection_id = %connection.id(),
                room = %room,
                error = %e,
                "Failed to send connected acknowledgment"
            );
        }

        Ok(room)
    }
}
