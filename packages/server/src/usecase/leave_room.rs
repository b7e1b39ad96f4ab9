//! UseCase: ルーム退出処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveRoomUseCase::execute() メソッド
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加中の接続の退出
//! - エッジケース：参加前に拒否された接続の退出（何もしない）

use std::sync::Arc;

use crate::domain::{ConnectionId, RoomId, RoomRegistry};

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    /// Registry（所属管理の抽象化）
    registry: Arc<dyn RoomRegistry>,
}

impl LeaveRoomUseCase {
    /// 新しい LeaveRoomUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// ルーム退出を実行
    ///
    /// # Returns
    ///
    /// 退出したルーム。参加していなかった場合は `None`
    pub async fn execute(&self, connection_id: ConnectionId) -> Option<RoomId> {
        let room = self.registry.leave(connection_id).await;
        match &room {
            Some(room) => tracing::info!(%connection_id, %room, "Client left room"),
            None => tracing::debug!(%connection_id, "Closed connection had no room"),
        }
        room
    }
}
