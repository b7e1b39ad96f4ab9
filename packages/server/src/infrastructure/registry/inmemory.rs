//! InMemory Room Registry 実装
//!
//! ドメイン層が定義する RoomRegistry trait の具体的な実装。
//! HashMap をインメモリの所属表として使用します。
//!
//! ルーム → メンバーと接続 → ルームの 2 つの表は 1 つの Mutex で保護し、
//! 両者が食い違う瞬間が生じないようにしています。ロック中は表の操作のみを行い、
//! 送信は呼び出し側がスナップショットに対して行います。

use std::{
    collections::{HashMap, hash_map::Entry},
    sync::Arc,
};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Connection, ConnectionId, RegistryError, RoomId, RoomRegistry, RoomSummary,
};

#[derive(Debug, Default)]
struct Memberships {
    /// ルーム ID → メンバー接続
    rooms: HashMap<RoomId, HashMap<ConnectionId, Arc<Connection>>>,
    /// 接続 ID → 所属ルーム ID
    connection_rooms: HashMap<ConnectionId, RoomId>,
}

/// インメモリ Room Registry 実装
#[derive(Debug, Default)]
pub struct InMemoryRoomRegistry {
    memberships: Mutex<Memberships>,
}

impl InMemoryRoomRegistry {
    /// 新しい InMemoryRoomRegistry を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomRegistry for InMemoryRoomRegistry {
    async fn join(&self, room: RoomId, connection: Arc<Connection>) -> Result<(), RegistryError> {
        let mut memberships = self.memberships.lock().await;
        let connection_id = connection.id();

        match memberships.connection_rooms.entry(connection_id) {
            Entry::Occupied(current) if current.get() != &room => {
                return Err(RegistryError::AlreadyInRoom {
                    current: current.get().clone(),
                });
            }
            Entry::Occupied(_) => {}
            Entry::Vacant(vacant) => {
                vacant.insert(room.clone());
            }
        }

        memberships
            .rooms
            .entry(room)
            .or_default()
            .insert(connection_id, connection);
        Ok(())
    }

    async fn leave(&self, connection_id: ConnectionId) -> Option<RoomId> {
        let mut memberships = self.memberships.lock().await;
        let room = memberships.connection_rooms.remove(&connection_id)?;

        if let Entry::Occupied(mut members) = memberships.rooms.entry(room.clone()) {
            members.get_mut().remove(&connection_id);
            if members.get().is_empty() {
                members.remove();
            }
        }
        Some(room)
    }

    async fn members_of(&self, room: &RoomId) -> Vec<Arc<Connection>> {
        let memberships = self.memberships.lock().await;
        memberships
            .rooms
            .get(room)
            .map(|members| members.values().cloned().collect())
            .unwrap_or_default()
    }

    async fn room_of(&self, connection_id: ConnectionId) -> Option<RoomId> {
        let memberships = self.memberships.lock().await;
        memberships.connection_rooms.get(&connection_id).cloned()
    }

    async fn rooms(&self) -> Vec<RoomSummary> {
        let memberships = self.memberships.lock().await;
        let mut rooms: Vec<RoomSummary> = memberships
            .rooms
            .iter()
            .map(|(room_id, members)| RoomSummary {
                room_id: room_id.clone(),
                members: members.len(),
            })
            .collect();
        rooms.sort_by(|a, b| a.room_id.cmp(&b.room_id));
        rooms
    }
}
