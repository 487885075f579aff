//! The sync coordinator: routes gateway events to per-server actors.
//!
//! The coordinator owns one actor per platform server id and forwards every
//! event for that id into the actor's mailbox. Serialization per server and
//! parallelism across servers both fall out of that ownership: a mailbox is
//! consumed by exactly one task, and distinct mailboxes are consumed by
//! distinct tasks.

pub mod actor;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::alert::AlertSink;
use crate::data::registration::RegistrationRepository;
use crate::data::server::ServerRepository;
use crate::error::AppError;
use crate::gateway::{CommandGateway, GatewayEvent};
use crate::service::resolver::NameResolver;
use crate::sync::actor::{ServerActor, ServerEvent};

/// Knobs shared by every per-server actor.
#[derive(Debug, Clone, Copy)]
pub struct SyncSettings {
    pub call_timeout: Duration,
    pub max_attempts: u32,
    pub backoff_base: Duration,
}

struct ActorHandle {
    tx: mpsc::Sender<ServerEvent>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

pub struct SyncCoordinator {
    db: DatabaseConnection,
    gateway: Arc<dyn CommandGateway>,
    resolver: Arc<NameResolver>,
    alerts: Arc<dyn AlertSink>,
    settings: SyncSettings,
    actors: Mutex<HashMap<String, ActorHandle>>,
}

impl SyncCoordinator {
    pub fn new(
        db: DatabaseConnection,
        gateway: Arc<dyn CommandGateway>,
        resolver: Arc<NameResolver>,
        alerts: Arc<dyn AlertSink>,
        settings: SyncSettings,
    ) -> Self {
        Self {
            db,
            gateway,
            resolver,
            alerts,
            settings,
            actors: Mutex::new(HashMap::new()),
        }
    }

    /// Consumes gateway events until the transport side drops the channel.
    pub async fn run(self: Arc<Self>, mut events: mpsc::Receiver<GatewayEvent>) {
        while let Some(event) = events.recv().await {
            self.handle_event(event).await;
        }
        tracing::info!("Gateway event channel closed, sync coordinator stopping");
    }

    pub async fn handle_event(&self, event: GatewayEvent) {
        match event {
            GatewayEvent::Connected { server_ids } => {
                self.retire_missing(&server_ids).await;
            }
            GatewayEvent::ServerAvailable {
                platform_id,
                display_name,
            } => {
                self.dispatch(&platform_id, ServerEvent::Available { display_name })
                    .await;
            }
            GatewayEvent::ServerRemoved { platform_id } => {
                self.remove_server(&platform_id).await;
            }
            GatewayEvent::CommandInvoked {
                platform_id,
                command_name,
            } => {
                if let Err(e) = self.check_drift(&platform_id, &command_name).await {
                    tracing::error!(
                        server = %platform_id,
                        command = %command_name,
                        "Drift check failed: {}",
                        e
                    );
                }
            }
        }
    }

    /// Queues a fresh sync for one server. Entry point for the stale-server
    /// sweep; identical to receiving a server-available event.
    pub async fn resync(&self, platform_id: &str, display_name: &str) {
        self.dispatch(
            platform_id,
            ServerEvent::Available {
                display_name: display_name.to_string(),
            },
        )
        .await;
    }

    /// Routes an event into the server's mailbox, spawning the actor on
    /// first contact.
    ///
    /// The map lock is held only to look up or install a handle, never
    /// across a mailbox operation, and sends never wait on a full mailbox:
    /// one server stuck in its backoff sleeps must not stall dispatch for
    /// every other server. A full mailbox already holds a sync for this
    /// server, so the dropped event is redundant; a dropped rename is
    /// caught up by the next sync the backlog runs.
    async fn dispatch(&self, platform_id: &str, event: ServerEvent) {
        let tx = {
            let mut actors = self.actors.lock().await;
            actors
                .entry(platform_id.to_string())
                .or_insert_with(|| self.spawn_handle(platform_id, None))
                .tx
                .clone()
        };

        match tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                tracing::warn!(server = %platform_id, "Sync mailbox full, event dropped");
            }
            // Terminated actor; replace it unless another path already has.
            Err(TrySendError::Closed(event)) => {
                let fresh_tx = {
                    let mut actors = self.actors.lock().await;
                    match actors.get(platform_id) {
                        Some(handle) if !handle.tx.same_channel(&tx) => handle.tx.clone(),
                        _ => {
                            let fresh = self.spawn_handle(platform_id, None);
                            let fresh_tx = fresh.tx.clone();
                            actors.insert(platform_id.to_string(), fresh);
                            fresh_tx
                        }
                    }
                };
                if fresh_tx.try_send(event).is_err() {
                    tracing::error!(server = %platform_id, "Replacement actor rejected the event");
                }
            }
        }
    }

    /// Removal cancels first, then queues. An in-flight sync observes the
    /// token at its next checkpoint and aborts; the queued removal event is
    /// the last thing the old actor processes.
    ///
    /// The old handle is replaced in the same lock scope by a successor
    /// gated on the old task, so a rejoin arriving in the removal window is
    /// queued behind the teardown instead of interleaving with it.
    async fn remove_server(&self, platform_id: &str) {
        let tx = {
            let mut actors = self.actors.lock().await;

            // No live actor still spawns one: the store may hold state for
            // a server whose actor never ran in this process.
            let old = actors
                .remove(platform_id)
                .unwrap_or_else(|| self.spawn_handle(platform_id, None));
            old.cancel.cancel();

            let fresh = self.spawn_handle(platform_id, Some(old.task));
            actors.insert(platform_id.to_string(), fresh);

            old.tx
        };

        // The cancelled actor drains its backlog without syncing, so this
        // send waits at most for those no-op passes.
        if tx.send(ServerEvent::Removed).await.is_err() {
            tracing::warn!(server = %platform_id, "Actor gone before removal could be queued");
        }
    }

    /// Reconciles stored membership against a connect-time snapshot. Active
    /// servers absent from the snapshot left while the process was down;
    /// they go through the same removal path as a live eviction.
    async fn retire_missing(&self, server_ids: &[String]) {
        let stored = match ServerRepository::new(&self.db).list_active().await {
            Ok(stored) => stored,
            Err(e) => {
                tracing::error!("Membership reconciliation failed to list servers: {}", e);
                return;
            }
        };

        let departed: Vec<String> = stored
            .into_iter()
            .filter(|server| !server_ids.iter().any(|id| *id == server.platform_id))
            .map(|server| server.platform_id)
            .collect();

        tracing::info!(
            snapshot = server_ids.len(),
            departed = departed.len(),
            "Connected; reconciling stored membership"
        );

        for platform_id in departed {
            self.remove_server(&platform_id).await;
        }
    }

    /// An invoked command with no registration record means the store's
    /// belief has drifted from the gateway's real state. Logged for the
    /// operator; the stale-server sweep repairs it.
    async fn check_drift(&self, platform_id: &str, command_name: &str) -> Result<(), AppError> {
        let Some(server) = ServerRepository::new(&self.db)
            .find_by_platform_id(platform_id)
            .await?
        else {
            tracing::warn!(
                server = %platform_id,
                command = %command_name,
                "Invocation from a server the store does not know"
            );
            return Ok(());
        };

        if RegistrationRepository::new(&self.db)
            .find(server.id, command_name)
            .await?
            .is_none()
        {
            tracing::warn!(
                server = %platform_id,
                command = %command_name,
                "Invoked command has no registration record, belief state has drifted"
            );
        }

        Ok(())
    }

    fn spawn_handle(&self, platform_id: &str, predecessor: Option<JoinHandle<()>>) -> ActorHandle {
        let cancel = CancellationToken::new();
        let (tx, task) = ServerActor::spawn(
            platform_id.to_string(),
            self.db.clone(),
            self.gateway.clone(),
            self.resolver.clone(),
            self.alerts.clone(),
            self.settings,
            cancel.clone(),
            predecessor,
        );

        ActorHandle { tx, cancel, task }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::testing::CollectingAlertSink;
    use crate::data::name_index::NameIndexRepository;
    use crate::gateway::testing::RecordingGateway;
    use crate::gateway::GatewayError;
    use crate::model::name::Scope;
    use test_utils::{builder::TestBuilder, factory};

    struct Harness {
        db: DatabaseConnection,
        gateway: Arc<RecordingGateway>,
        resolver: Arc<NameResolver>,
        alerts: Arc<CollectingAlertSink>,
        coordinator: SyncCoordinator,
    }

    async fn setup(gateway: RecordingGateway, settings: SyncSettings) -> Harness {
        let test = TestBuilder::new().with_sync_tables().build().await.unwrap();
        let db = test.db.unwrap();

        let gateway = Arc::new(gateway);
        let resolver = Arc::new(NameResolver::new(db.clone()));
        let alerts = Arc::new(CollectingAlertSink::new());
        let coordinator = SyncCoordinator::new(
            db.clone(),
            gateway.clone(),
            resolver.clone(),
            alerts.clone(),
            settings,
        );

        Harness {
            db,
            gateway,
            resolver,
            alerts,
            coordinator,
        }
    }

    fn fast_settings() -> SyncSettings {
        SyncSettings {
            call_timeout: Duration::from_secs(1),
            max_attempts: 1,
            backoff_base: Duration::from_millis(5),
        }
    }

    /// Polls until the condition holds or two seconds pass.
    async fn eventually<F, Fut>(mut check: F)
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = bool>,
    {
        for _ in 0..100 {
            if check().await {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("condition not met within two seconds");
    }

    #[tokio::test]
    async fn available_event_runs_a_full_sync() {
        let h = setup(RecordingGateway::new(), fast_settings()).await;

        h.coordinator
            .handle_event(GatewayEvent::ServerAvailable {
                platform_id: "42".to_string(),
                display_name: "Autumn Order".to_string(),
            })
            .await;

        eventually(|| async {
            ServerRepository::new(&h.db)
                .find_by_platform_id("42")
                .await
                .unwrap()
                .is_some_and(|s| s.last_sync_at.is_some())
        })
        .await;

        let server = ServerRepository::new(&h.db)
            .find_by_platform_id("42")
            .await
            .unwrap()
            .unwrap();

        // The default command set landed as registrations.
        let records = RegistrationRepository::new(&h.db)
            .list_for_server(server.id)
            .await
            .unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.command_name.as_str()).collect();
        assert!(names.contains(&"alias"));
        assert!(names.contains(&"resolve"));
        assert!(names.contains(&"status"));

        // The display name resolves in the server's own scope.
        let resolved = h
            .resolver
            .resolve("autumn order", Scope(server.id))
            .await
            .unwrap();
        assert_eq!(resolved, server.id);
    }

    #[tokio::test]
    async fn events_for_one_server_never_overlap() {
        let gateway = RecordingGateway::with_delay(Duration::from_millis(30));
        // Four failures: both passes attempt alias twice and give up.
        for _ in 0..4 {
            gateway.fail_next("alias", GatewayError::Remote("503".to_string()));
        }

        let h = setup(gateway, fast_settings()).await;

        for _ in 0..2 {
            h.coordinator
                .handle_event(GatewayEvent::ServerAvailable {
                    platform_id: "7".to_string(),
                    display_name: "Busy".to_string(),
                })
                .await;
        }

        // First pass: alias twice plus resolve and status. Second pass:
        // alias twice, siblings unchanged.
        eventually(|| async { h.gateway.call_count() == 6 }).await;
        assert_eq!(h.gateway.max_concurrent(), 1);
    }

    #[tokio::test]
    async fn distinct_servers_sync_concurrently() {
        let gateway = RecordingGateway::with_delay(Duration::from_millis(50));
        let h = setup(gateway, fast_settings()).await;

        h.coordinator
            .handle_event(GatewayEvent::ServerAvailable {
                platform_id: "1".to_string(),
                display_name: "First".to_string(),
            })
            .await;
        h.coordinator
            .handle_event(GatewayEvent::ServerAvailable {
                platform_id: "2".to_string(),
                display_name: "Second".to_string(),
            })
            .await;

        let synced = |platform_id: &'static str| {
            let db = h.db.clone();
            async move {
                ServerRepository::new(&db)
                    .find_by_platform_id(platform_id)
                    .await
                    .unwrap()
                    .is_some_and(|s| s.last_sync_at.is_some())
            }
        };
        eventually(|| synced("1")).await;
        eventually(|| synced("2")).await;

        assert!(h.gateway.max_concurrent() >= 2);
    }

    #[tokio::test]
    async fn full_mailbox_never_stalls_other_servers() {
        // Slow calls keep the first server's sync in flight while its
        // mailbox fills past capacity.
        let gateway = RecordingGateway::with_delay(Duration::from_millis(300));
        let h = setup(gateway, fast_settings()).await;

        let flood = async {
            for _ in 0..18 {
                h.coordinator
                    .handle_event(GatewayEvent::ServerAvailable {
                        platform_id: "1".to_string(),
                        display_name: "Swamped".to_string(),
                    })
                    .await;
            }
        };
        tokio::time::timeout(Duration::from_millis(500), flood)
            .await
            .expect("dispatch must not wait on a full mailbox");

        // An unrelated server dispatches and syncs regardless of the backlog.
        let other = h.coordinator.handle_event(GatewayEvent::ServerAvailable {
            platform_id: "2".to_string(),
            display_name: "Unrelated".to_string(),
        });
        tokio::time::timeout(Duration::from_millis(250), other)
            .await
            .expect("dispatch for another server stalled behind the backlog");

        eventually(|| async {
            ServerRepository::new(&h.db)
                .find_by_platform_id("2")
                .await
                .unwrap()
                .is_some_and(|s| s.last_sync_at.is_some())
        })
        .await;
    }

    #[tokio::test]
    async fn removal_during_sync_discards_the_result() {
        let h = setup(
            RecordingGateway::with_delay(Duration::from_millis(100)),
            fast_settings(),
        )
        .await;

        let server = factory::server::ServerFactory::new(&h.db)
            .platform_id("9")
            .name("Gone Soon")
            .build()
            .await
            .unwrap();
        factory::name_index::NameIndexFactory::new(&h.db, server.id, server.id)
            .raw_name("Gone Soon")
            .build()
            .await
            .unwrap();

        h.coordinator
            .handle_event(GatewayEvent::ServerAvailable {
                platform_id: "9".to_string(),
                display_name: "Gone Soon".to_string(),
            })
            .await;
        h.coordinator
            .handle_event(GatewayEvent::ServerRemoved {
                platform_id: "9".to_string(),
            })
            .await;

        eventually(|| async {
            ServerRepository::new(&h.db)
                .find_by_platform_id("9")
                .await
                .unwrap()
                .is_some_and(|s| !s.active)
        })
        .await;

        // No belief state survives the removal.
        let records = RegistrationRepository::new(&h.db)
            .list_for_server(server.id)
            .await
            .unwrap();
        assert!(records.is_empty());
        let bindings = NameIndexRepository::new(&h.db)
            .find_active(Scope(server.id), "Gone Soon")
            .await
            .unwrap();
        assert!(bindings.is_empty());
    }

    #[tokio::test]
    async fn rejoin_during_removal_waits_for_teardown() {
        let h = setup(
            RecordingGateway::with_delay(Duration::from_millis(50)),
            fast_settings(),
        )
        .await;

        h.coordinator
            .handle_event(GatewayEvent::ServerAvailable {
                platform_id: "21".to_string(),
                display_name: "Back Again".to_string(),
            })
            .await;
        eventually(|| async {
            ServerRepository::new(&h.db)
                .find_by_platform_id("21")
                .await
                .unwrap()
                .is_some_and(|s| s.last_sync_at.is_some())
        })
        .await;

        // A rejoin lands right behind the removal. Its sync must run after
        // the teardown transaction, never interleaved with it.
        h.coordinator
            .handle_event(GatewayEvent::ServerRemoved {
                platform_id: "21".to_string(),
            })
            .await;
        h.coordinator
            .handle_event(GatewayEvent::ServerAvailable {
                platform_id: "21".to_string(),
                display_name: "Back Again".to_string(),
            })
            .await;

        eventually(|| async {
            let Some(server) = ServerRepository::new(&h.db)
                .find_by_platform_id("21")
                .await
                .unwrap()
            else {
                return false;
            };
            let records = RegistrationRepository::new(&h.db)
                .list_for_server(server.id)
                .await
                .unwrap();
            server.active && records.len() == 3
        })
        .await;

        // The display name resolves again after the rejoin sync.
        let server = ServerRepository::new(&h.db)
            .find_by_platform_id("21")
            .await
            .unwrap()
            .unwrap();
        let resolved = h
            .resolver
            .resolve("back again", Scope(server.id))
            .await
            .unwrap();
        assert_eq!(resolved, server.id);
    }

    #[tokio::test]
    async fn connect_snapshot_retires_departed_servers() {
        let h = setup(RecordingGateway::new(), fast_settings()).await;

        factory::server::ServerFactory::new(&h.db)
            .platform_id("100")
            .build()
            .await
            .unwrap();
        factory::server::ServerFactory::new(&h.db)
            .platform_id("200")
            .build()
            .await
            .unwrap();

        h.coordinator
            .handle_event(GatewayEvent::Connected {
                server_ids: vec!["200".to_string()],
            })
            .await;

        eventually(|| async {
            ServerRepository::new(&h.db)
                .find_by_platform_id("100")
                .await
                .unwrap()
                .is_some_and(|s| !s.active)
        })
        .await;

        let survivor = ServerRepository::new(&h.db)
            .find_by_platform_id("200")
            .await
            .unwrap()
            .unwrap();
        assert!(survivor.active);
    }

    #[tokio::test]
    async fn exhausted_attempts_alert_the_operator() {
        let gateway = RecordingGateway::new();
        // Two attempts, each with an immediate retry.
        for _ in 0..4 {
            gateway.fail_next("alias", GatewayError::Timeout);
        }

        let settings = SyncSettings {
            max_attempts: 2,
            ..fast_settings()
        };
        let h = setup(gateway, settings).await;

        h.coordinator
            .handle_event(GatewayEvent::ServerAvailable {
                platform_id: "13".to_string(),
                display_name: "Flaky".to_string(),
            })
            .await;

        eventually(|| async { !h.alerts.alerts().is_empty() }).await;

        let alerts = h.alerts.alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].platform_id, "13");
        assert_eq!(alerts[0].command_name.as_deref(), Some("alias"));
        assert_eq!(alerts[0].kind, "reconcile_failed");
        assert_eq!(alerts[0].message, "timeout");

        // Siblings still landed despite the exhausted command.
        let server = ServerRepository::new(&h.db)
            .find_by_platform_id("13")
            .await
            .unwrap()
            .unwrap();
        let records = RegistrationRepository::new(&h.db)
            .list_for_server(server.id)
            .await
            .unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.command_name.as_str()).collect();
        assert!(names.contains(&"resolve"));
        assert!(names.contains(&"status"));
        assert!(!names.contains(&"alias"));
    }
}
