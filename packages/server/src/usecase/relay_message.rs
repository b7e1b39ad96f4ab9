//! UseCase: メッセージ中継処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelayMessageUseCase::execute() メソッド
//! - デコード、検証、エンベロープ化、ルーム全員への配信
//!
//! ### なぜこのテストが必要か
//! - 送信者を含むルームの全メンバーに同一のバイト列が届くことを保証
//! - 他のルームには配信されないことを確認
//! - 1 人への配信失敗が他のメンバーへの配信を止めないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数メンバーへの配信
//! - 異常系：不正な JSON、検証エラー
//! - エッジケース：キューが満杯・切断済みのメンバー、メンバー 0 人のルーム

use std::sync::Arc;

use axum::extract::ws::Utf8Bytes;
use roomrelay_shared::time::now_rfc3339;

use crate::{
    domain::{ChatMessage, RoomId, RoomRegistry, validate_payload},
    infrastructure::dto::websocket::ServerResponse,
};

use super::error::RelayError;

/// 1 回の配信結果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// 配信を試みたメンバー数
    pub recipients: usize,
    /// キューへの投入に失敗したメンバー数
    pub failed: usize,
}

impl BroadcastReport {
    pub fn delivered(&self) -> usize {
        self.recipients - self.failed
    }
}

/// メッセージ中継のユースケース
pub struct RelayMessageUseCase {
    /// Registry（所属管理の抽象化）
    registry: Arc<dyn RoomRegistry>,
}

impl RelayMessageUseCase {
    /// 新しい RelayMessageUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// メッセージ中継を実行
    ///
    /// # Arguments
    ///
    /// * `room` - 送信者が所属するルーム
    /// * `payload` - 受信したテキストフレーム
    ///
    /// # Returns
    ///
    /// * `Ok(BroadcastReport)` - 配信結果
    /// * `Err(RelayError)` - デコードまたは検証に失敗（誰にも配信していない）
    pub async fn execute(
        &self,
        room: &RoomId,
        payload: &str,
    ) -> Result<BroadcastReport, RelayError> {
        // 1. デコードと検証
        // 空のフレームは null と同じく「メッセージなし」として扱う
        let decoded: Option<ChatMessage> = if payload.trim().is_empty() {
            None
        } else {
            serde_json::from_str(payload).map_err(RelayError::Malformed)?
        };
        let message = validate_payload(decoded)?;

        // 2. エンベロープを 1 回だけシリアライズ
        let response = ServerResponse::ok(message, now_rfc3339());
        let response_json: Utf8Bytes = serde_json::to_string(&response)
            .map_err(RelayError::Encode)?
            .into();

        // 3. 現時点のメンバーに配信
        Ok(self.broadcast(room, &response_json).await)
    }

    /// ルームのスナップショットに対して配信する
    ///
    /// 失敗したメンバーはログに残すだけで、残りへの配信は続ける
    async fn broadcast(&self, room: &RoomId, payload: &Utf8Bytes) -> BroadcastReport {
        let members = self.registry.members_of(room).await;
        let mut report = BroadcastReport {
            recipients: members.len(),
            failed: 0,
        };

        for member in &members {
            if let Err(e) = member.send_text(payload.clone()) {
                report.failed += 1;
                tracing::warn!(
                    connection_id = %member.id(),
                    room = %room,
                    error = %e,
                    "Failed to deliver message"
                );
            }
        }

        tracing::debug!(
            room = %room,
            recipients = report.recipients,
            failed = report.failed,
            "Broadcast message"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Connection, MockRoomRegistry, OutboundFrame, ValidationError},
        infrastructure::registry::InMemoryRoomRegistry,
    };
    use serde_json::{Value, json};
    use tokio::sync::mpsc;

    const VALID: &str = r#"{"userId":"5","username":"alice","message":"hi","timestamp":"2024-01-01T00:00:00Z","messageType":"TEXT"}"#;

    async fn join(
        registry: &InMemoryRoomRegistry,
        room: &str,
    ) -> (Arc<Connection>, mpsc::Receiver<OutboundFrame>) {
        let (connection, rx) = Connection::with_queue(None, 4);
        let connection = Arc::new(connection);
        registry
            .join(RoomId::new(room), connection.clone())
            .await
            .unwrap();
        (connection, rx)
    }

    fn received(rx: &mut mpsc::Receiver<OutboundFrame>) -> Option<Value> {
        match rx.try_recv().ok()? {
            OutboundFrame::Text(text) => Some(serde_json::from_str(text.as_str()).unwrap()),
            OutboundFrame::Close { .. } => None,
        }
    }

    #[tokio::test]
    async fn test_relay_message_to_every_member() {
        // テスト項目: 送信者を含むルームの全員に同じエンベロープが届き、他のルームには届かない
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let usecase = RelayMessageUseCase::new(registry.clone());
        let (_alice, mut rx_alice) = join(&registry, "42").await;
        let (_bob, mut rx_bob) = join(&registry, "42").await;
        let (_carol, mut rx_carol) = join(&registry, "42").await;
        let (_dave, mut rx_dave) = join(&registry, "other").await;

        // when (操作):
        let report = usecase.execute(&RoomId::new("42"), VALID).await.unwrap();

        // then (期待する結果):
        assert_eq!(
            report,
            BroadcastReport {
                recipients: 3,
                failed: 0
            }
        );
        let expected_data: Value = serde_json::from_str(VALID).unwrap();
        let first = received(&mut rx_alice).unwrap();
        assert_eq!(first["status"], "OK");
        assert_eq!(first["data"], expected_data);
        assert!(first["serverTimestamp"].is_string());
        assert_eq!(received(&mut rx_bob), Some(first.clone()));
        assert_eq!(received(&mut rx_carol), Some(first));
        assert_eq!(received(&mut rx_dave), None);
    }

    #[tokio::test]
    async fn test_relay_message_shares_one_buffer() {
        // テスト項目: 全メンバーに同じバッファが共有され、メンバーごとにコピーされない
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let usecase = RelayMessageUseCase::new(registry.clone());
        let (_alice, mut rx_alice) = join(&registry, "42").await;
        let (_bob, mut rx_bob) = join(&registry, "42").await;

        // when (操作):
        usecase.execute(&RoomId::new("42"), VALID).await.unwrap();

        // then (期待する結果):
        let (Ok(OutboundFrame::Text(first)), Ok(OutboundFrame::Text(second))) =
            (rx_alice.try_recv(), rx_bob.try_recv())
        else {
            panic!("both members should receive a text frame");
        };
        assert_eq!(first, second);
        assert_eq!(first.as_str().as_ptr(), second.as_str().as_ptr());
    }

    #[tokio::test]
    async fn test_relay_message_malformed_json() {
        // テスト項目: JSON として解釈できないペイロードは Malformed になり、誰にも配信されない
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let usecase = RelayMessageUseCase::new(registry.clone());
        let (_alice, mut rx_alice) = join(&registry, "42").await;

        // when (操作):
        let result = usecase.execute(&RoomId::new("42"), "{not json").await;

        // then (期待する結果):
        assert!(matches!(result, Err(RelayError::Malformed(_))));
        assert_eq!(received(&mut rx_alice), None);
    }

    #[tokio::test]
    async fn test_relay_message_numeric_fields_are_relayed_as_text() {
        // テスト項目: 数値のフィールドは文字列として検証・配信される
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let usecase = RelayMessageUseCase::new(registry.clone());
        let (_alice, mut rx_alice) = join(&registry, "42").await;
        let payload = json!({
            "userId": 5,
            "username": "alice",
            "message": "hi",
            "timestamp": "2024-01-01T00:00:00Z",
            "messageType": "TEXT"
        })
        .to_string();

        // when (操作):
        let report = usecase.execute(&RoomId::new("42"), &payload).await.unwrap();

        // then (期待する結果):
        assert_eq!(report.delivered(), 1);
        let envelope = received(&mut rx_alice).unwrap();
        assert_eq!(envelope["data"]["userId"], "5");
    }

    #[tokio::test]
    async fn test_relay_message_nested_field_is_malformed() {
        // テスト項目: 配列・オブジェクトのフィールドはデコードエラーになる
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let usecase = RelayMessageUseCase::new(registry);

        // when (操作):
        let result = usecase
            .execute(&RoomId::new("42"), r#"{"userId":[5]}"#)
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(RelayError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_relay_message_invalid_message() {
        // テスト項目: 検証に失敗したメッセージは Invalid になり、誰にも配信されない
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let usecase = RelayMessageUseCase::new(registry.clone());
        let (_alice, mut rx_alice) = join(&registry, "42").await;
        let (_bob, mut rx_bob) = join(&registry, "42").await;
        let payload = json!({
            "userId": "0",
            "username": "alice",
            "message": "hi",
            "timestamp": "2024-01-01T00:00:00Z",
            "messageType": "TEXT"
        })
        .to_string();

        // when (操作):
        let result = usecase.execute(&RoomId::new("42"), &payload).await;

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(RelayError::Invalid(ValidationError::UserIdOutOfRange { .. }))
        ));
        assert_eq!(received(&mut rx_alice), None);
        assert_eq!(received(&mut rx_bob), None);
    }

    #[tokio::test]
    async fn test_relay_message_null_payload_is_invalid() {
        // テスト項目: null ペイロードは検証エラーとして扱われる
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let usecase = RelayMessageUseCase::new(registry);

        // when (操作):
        let result = usecase.execute(&RoomId::new("42"), "null").await;

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(RelayError::Invalid(ValidationError::MissingPayload))
        ));
    }

    #[tokio::test]
    async fn test_relay_message_empty_payload_is_invalid() {
        // テスト項目: 空・空白のみのペイロードは null と同じく検証エラーになる
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let usecase = RelayMessageUseCase::new(registry);

        // then (期待する結果):
        for payload in ["", "   ", "\n\t"] {
            let result = usecase.execute(&RoomId::new("42"), payload).await;
            assert!(matches!(
                result,
                Err(RelayError::Invalid(ValidationError::MissingPayload))
            ));
        }
    }

    #[tokio::test]
    async fn test_relay_message_failed_member_does_not_stop_others() {
        // テスト項目: 満杯・切断済みのメンバーがいても残りのメンバーには配信される
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let usecase = RelayMessageUseCase::new(registry.clone());

        let (slow, _rx_slow) = Connection::with_queue(None, 1);
        let slow = Arc::new(slow);
        slow.send_text("backlog").unwrap();
        registry.join(RoomId::new("42"), slow).await.unwrap();

        let (gone, rx_gone) = Connection::with_queue(None, 4);
        drop(rx_gone);
        registry
            .join(RoomId::new("42"), Arc::new(gone))
            .await
            .unwrap();

        let (_healthy, mut rx_healthy) = join(&registry, "42").await;

        // when (操作):
        let report = usecase.execute(&RoomId::new("42"), VALID).await.unwrap();

        // then (期待する結果):
        assert_eq!(
            report,
            BroadcastReport {
                recipients: 3,
                failed: 2
            }
        );
        assert_eq!(report.delivered(), 1);
        assert_eq!(received(&mut rx_healthy).unwrap()["status"], "OK");
    }

    #[tokio::test]
    async fn test_relay_message_to_empty_room_is_noop() {
        // テスト項目: メンバー 0 人のルームへの配信はエラーにならない
        // given (前提条件):
        let mut registry = MockRoomRegistry::new();
        registry
            .expect_members_of()
            .times(1)
            .returning(|_| Vec::new());
        let usecase = RelayMessageUseCase::new(Arc::new(registry));

        // when (操作):
        let result = usecase.execute(&RoomId::new("gone"), VALID).await;

        // then (期待する結果):
        assert_eq!(result.unwrap(), BroadcastReport::default());
    }
}
