//! # Presence
//!
//! Who is connected to the live recipe feed right now.
//!
//! ## Wire format
//!
//! JSON text frames shaped as `{"event": <name>, "data": {...}}`.
//!
//! Server to client
//! - `welcome`: only to the client that just joined, carries its guest name
//! - `usersOnline`: to everyone after any join or leave, full list in join order
//! - `recipeActivity`: to everyone except the client that is viewing a recipe
//!
//! Client to server
//! - `viewingRecipe`: `{ "recipeName": string }`
//!
//! ## Invariants
//!
//! - The member list holds exactly the open connections, in connection order
//! - `usersOnline.count` always equals `usersOnline.users.len()`
//! - A member whose outbox is closed or full is dropped, and everyone left gets a fresh roster
use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::sync::{
    RwLock,
    mpsc::{Receiver, Sender, channel, error::TrySendError},
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::state::AppState;

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    #[serde(rename_all = "camelCase")]
    Welcome { message: String, your_name: String },

    UsersOnline { count: usize, users: Vec<String> },

    RecipeActivity {
        user: String,
        recipe: String,
        action: String,
    },
}

#[derive(Deserialize, Debug, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    #[serde(rename_all = "camelCase")]
    ViewingRecipe { recipe_name: String },
}

/// Events queued per connection before it counts as stalled.
pub const OUTBOX_CAPACITY: usize = 64;

struct Member {
    id: Uuid,
    name: String,
    outbox: Sender<ServerEvent>,
}

/// Handle held by one connection for as long as it is open.
pub struct Session {
    pub id: Uuid,
    pub name: String,
    pub events: Receiver<ServerEvent>,
}

#[derive(Default)]
pub struct Presence {
    members: RwLock<Vec<Member>>,
}

pub fn guest_name() -> String {
    format!("Chef_{}", rand::rng().random_range(1000..=9999))
}

impl Presence {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn join(&self) -> Session {
        self.join_as(guest_name()).await
    }

    pub async fn join_as(&self, name: String) -> Session {
        let (outbox, events) = channel(OUTBOX_CAPACITY);
        let id = Uuid::new_v4();

        let _ = outbox.try_send(ServerEvent::Welcome {
            message: format!("Welcome to Recipe Hub, {name}!"),
            your_name: name.clone(),
        });

        let mut members = self.members.write().await;
        members.push(Member {
            id,
            name: name.clone(),
            outbox,
        });

        info!("{name} connected. Total online: {}", members.len());
        let event = users_online(&members);
        broadcast(&mut members, event, None);

        Session { id, name, events }
    }

    pub async fn leave(&self, id: Uuid) {
        let mut members = self.members.write().await;
        let Some(index) = members.iter().position(|member| member.id == id) else {
            return;
        };

        let member = members.remove(index);
        info!("{} disconnected. Total online: {}", member.name, members.len());

        let event = users_online(&members);
        broadcast(&mut members, event, None);
    }

    /// Tells every other member that `id` is looking at `recipe`.
    pub async fn viewing(&self, id: Uuid, recipe: &str) {
        let mut members = self.members.write().await;
        let Some(user) = members
            .iter()
            .find(|member| member.id == id)
            .map(|member| member.name.clone())
        else {
            return;
        };

        info!("{user} is viewing: {recipe}");

        let event = ServerEvent::RecipeActivity {
            user,
            recipe: recipe.to_string(),
            action: "viewing".to_string(),
        };
        broadcast(&mut members, event, Some(id));
    }

    pub async fn online_count(&self) -> usize {
        self.members.read().await.len()
    }

    pub async fn users(&self) -> Vec<String> {
        self.members
            .read()
            .await
            .iter()
            .map(|member| member.name.clone())
            .collect()
    }
}

fn users_online(members: &[Member]) -> ServerEvent {
    ServerEvent::UsersOnline {
        count: members.len(),
        users: members.iter().map(|member| member.name.clone()).collect(),
    }
}

/// Sends `event` to everyone but `except`. Members that could not take it are dropped
/// and the rest are sent the corrected roster.
fn broadcast(members: &mut Vec<Member>, event: ServerEvent, except: Option<Uuid>) {
    let mut pruned = deliver(members, &event, except);

    while pruned > 0 {
        let roster = users_online(members);
        pruned = deliver(members, &roster, None);
    }
}

/// Returns how many members were dropped.
fn deliver(members: &mut Vec<Member>, event: &ServerEvent, except: Option<Uuid>) -> usize {
    let before = members.len();

    members.retain(|member| {
        if Some(member.id) == except {
            return true;
        }

        match member.outbox.try_send(event.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!("Dropping {}, outbox full", member.name);
                false
            }
            Err(TrySendError::Closed(_)) => {
                debug!("Pruning closed connection for {}", member.name);
                false
            }
        }
    });

    before - members.len()
}

pub async fn ws_handler(
    State(state): State<Arc<AppState>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(state, socket))
}

async fn handle_socket(state: Arc<AppState>, socket: WebSocket) {
    let mut session = state.presence.join().await;
    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            outgoing = session.events.recv() => {
                let Some(event) = outgoing else { break };

                let text = match serde_json::to_string(&event) {
                    Ok(text) => text,
                    Err(e) => {
                        warn!("Failed to encode presence event: {e}");
                        continue;
                    }
                };

                if sender.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }

            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientEvent>(text.as_str()) {
                            Ok(ClientEvent::ViewingRecipe { recipe_name }) => {
                                state.presence.viewing(session.id, &recipe_name).await;
                            }
                            Err(e) => debug!("Ignoring client frame from {}: {e}", session.name),
                        }
                    }
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    state.presence.leave(session.id).await;
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn drain(session: &mut Session) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = session.events.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_join_sends_welcome_then_roster() {
        let presence = Presence::new();
        let mut alice = presence.join_as("Chef_1111".into()).await;

        assert_eq!(
            drain(&mut alice),
            vec![
                ServerEvent::Welcome {
                    message: "Welcome to Recipe Hub, Chef_1111!".into(),
                    your_name: "Chef_1111".into(),
                },
                ServerEvent::UsersOnline {
                    count: 1,
                    users: vec!["Chef_1111".into()],
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_roster_broadcast_to_everyone() {
        let presence = Presence::new();
        let mut alice = presence.join_as("Chef_1111".into()).await;
        drain(&mut alice);

        let _bob = presence.join_as("Chef_2222".into()).await;

        assert_eq!(
            drain(&mut alice),
            vec![ServerEvent::UsersOnline {
                count: 2,
                users: vec!["Chef_1111".into(), "Chef_2222".into()],
            }]
        );
        assert_eq!(presence.online_count().await, 2);
    }

    #[tokio::test]
    async fn test_leave_updates_remaining() {
        let presence = Presence::new();
        let mut alice = presence.join_as("Chef_1111".into()).await;
        let bob = presence.join_as("Chef_2222".into()).await;
        drain(&mut alice);

        presence.leave(bob.id).await;

        assert_eq!(
            drain(&mut alice),
            vec![ServerEvent::UsersOnline {
                count: 1,
                users: vec!["Chef_1111".into()],
            }]
        );
        assert_eq!(presence.users().await, vec!["Chef_1111".to_string()]);

        presence.leave(bob.id).await;
        assert!(drain(&mut alice).is_empty());
    }

    #[tokio::test]
    async fn test_viewing_skips_the_viewer() {
        let presence = Presence::new();
        let mut alice = presence.join_as("Chef_1111".into()).await;
        let mut bob = presence.join_as("Chef_2222".into()).await;
        drain(&mut alice);
        drain(&mut bob);

        presence.viewing(alice.id, "Pad Thai").await;

        assert!(drain(&mut alice).is_empty());
        assert_eq!(
            drain(&mut bob),
            vec![ServerEvent::RecipeActivity {
                user: "Chef_1111".into(),
                recipe: "Pad Thai".into(),
                action: "viewing".into(),
            }]
        );
    }

    #[tokio::test]
    async fn test_dropped_receiver_is_pruned() {
        let presence = Presence::new();
        let mut alice = presence.join_as("Chef_1111".into()).await;
        let bob = presence.join_as("Chef_2222".into()).await;
        drop(bob);

        presence.viewing(alice.id, "Soup").await;

        assert_eq!(presence.users().await, vec!["Chef_1111".to_string()]);
        drain(&mut alice);
    }

    #[tokio::test]
    async fn test_pruning_resends_roster() {
        let presence = Presence::new();
        let mut alice = presence.join_as("Chef_1111".into()).await;
        let bob = presence.join_as("Chef_2222".into()).await;
        let mut carol = presence.join_as("Chef_3333".into()).await;
        drain(&mut alice);
        drain(&mut carol);
        drop(bob);

        presence.viewing(alice.id, "Laksa").await;

        let roster = ServerEvent::UsersOnline {
            count: 2,
            users: vec!["Chef_1111".into(), "Chef_3333".into()],
        };
        assert_eq!(drain(&mut alice), vec![roster.clone()]);
        assert_eq!(
            drain(&mut carol),
            vec![
                ServerEvent::RecipeActivity {
                    user: "Chef_1111".into(),
                    recipe: "Laksa".into(),
                    action: "viewing".into(),
                },
                roster,
            ]
        );
    }

    #[tokio::test]
    async fn test_stalled_member_is_dropped() {
        let presence = Presence::new();
        let mut alice = presence.join_as("Chef_1111".into()).await;
        let _bob = presence.join_as("Chef_2222".into()).await;

        for _ in 0..=OUTBOX_CAPACITY {
            presence.viewing(alice.id, "Soup").await;
        }

        assert_eq!(presence.users().await, vec!["Chef_1111".to_string()]);
        assert_eq!(
            drain(&mut alice).last(),
            Some(&ServerEvent::UsersOnline {
                count: 1,
                users: vec!["Chef_1111".into()],
            })
        );
    }

    #[test]
    fn test_wire_format() {
        let event = ServerEvent::Welcome {
            message: "hi".into(),
            your_name: "Chef_1234".into(),
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({ "event": "welcome", "data": { "message": "hi", "yourName": "Chef_1234" } })
        );

        let online = ServerEvent::UsersOnline {
            count: 0,
            users: vec![],
        };
        assert_eq!(
            serde_json::to_value(&online).unwrap(),
            json!({ "event": "usersOnline", "data": { "count": 0, "users": [] } })
        );

        let inbound: ClientEvent = serde_json::from_value(
            json!({ "event": "viewingRecipe", "data": { "recipeName": "Ramen" } }),
        )
        .unwrap();
        assert_eq!(
            inbound,
            ClientEvent::ViewingRecipe {
                recipe_name: "Ramen".into()
            }
        );
    }

    #[test]
    fn test_guest_name_shape() {
        let name = guest_name();
        let number: u32 = name.strip_prefix("Chef_").unwrap().parse().unwrap();
        assert!((1000..=9999).contains(&number));
    }
}
