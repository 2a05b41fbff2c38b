//! App lifecycle core — provisioning, change dispatch and teardown of one app.
//!
//! Every app hosted on the device is driven by one [`AppLifecycle`]:
//!
//! 1. [`new`](AppLifecycle::new) subscribes to the bus for the store namespace
//!    and starts dispatching events to the app
//! 2. [`init`](AppLifecycle::init) runs the variant's warm-up
//! 3. [`create_objects`](AppLifecycle::create_objects) provisions the
//!    visibility object (create-if-absent)
//! 4. change events flow bus → core → [`AppHooks`]
//! 5. [`unload`](AppLifecycle::unload) removes the app from the device when
//!    configured to, then releases the subscription

use std::sync::{Arc, Mutex, PoisonError};

use serde_json::json;

use pixelhub_domain::app::AppDefinition;
use pixelhub_domain::error::PixelHubError;
use pixelhub_domain::event::ChangeEvent;
use pixelhub_domain::object::{LocalizedText, ObjectCommon, StoredObject, ValueType};
use pixelhub_domain::path::ObjectId;
use pixelhub_domain::state::State;

use crate::dispatcher::{ChangeHandler, Dispatcher};
use crate::event_bus::{EventFilter, InProcessEventBus};
use crate::hooks::AppHooks;
use crate::ports::{AppClient, ObjectStore};

/// Object subtree apps are provisioned under.
pub const APPS_PREFIX: &str = "apps";

/// Adapter-level switches that shape the lifecycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct LifecycleOptions {
    /// Delete the app from the device when it is unloaded.
    pub remove_apps_on_stop: bool,
}

/// Lifecycle driver for a single app.
pub struct AppLifecycle<H, S, C> {
    definition: AppDefinition,
    hooks: H,
    store: Arc<S>,
    client: Arc<C>,
    options: LifecycleOptions,
    dispatcher: Mutex<Option<Dispatcher>>,
}

impl<H, S, C> AppLifecycle<H, S, C>
where
    H: AppHooks + 'static,
    S: ObjectStore + 'static,
    C: AppClient + 'static,
{
    /// Construct the app and subscribe it to `bus`.
    ///
    /// Only events inside the store's namespace are delivered; they are
    /// processed one at a time until [`unload`](Self::unload) is called or
    /// the returned handle is dropped.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn new(
        definition: AppDefinition,
        hooks: H,
        store: Arc<S>,
        client: Arc<C>,
        bus: &InProcessEventBus,
        options: LifecycleOptions,
    ) -> Arc<Self> {
        let subscription =
            bus.subscribe_filtered(EventFilter::Namespace(store.namespace().clone()));
        let app = Arc::new(Self {
            definition,
            hooks,
            store,
            client,
            options,
            dispatcher: Mutex::new(None),
        });
        let dispatcher = Dispatcher::spawn(Arc::downgrade(&app), subscription);
        *app.lock_dispatcher() = Some(dispatcher);
        tracing::debug!(app = app.name(), "app subscribed to change events");
        app
    }

    /// The stable app identifier.
    #[must_use]
    pub fn name(&self) -> &str {
        self.definition.name()
    }

    #[must_use]
    pub fn definition(&self) -> &AppDefinition {
        &self.definition
    }

    #[must_use]
    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    /// Whether change events are still being dispatched to this app.
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.lock_dispatcher()
            .as_ref()
            .is_some_and(Dispatcher::is_running)
    }

    /// Run the variant's warm-up.
    ///
    /// # Errors
    ///
    /// Propagates whatever the variant's [`AppHooks::init`] returns.
    pub async fn init(&self) -> Result<(), PixelHubError> {
        self.hooks.init().await
    }

    /// Namespace-relative id of the visibility object under `prefix`.
    ///
    /// # Errors
    ///
    /// Returns a validation error when `prefix` is not a valid dotted path.
    pub fn visibility_id(&self, prefix: &str) -> Result<ObjectId, PixelHubError> {
        ObjectId::new(format!("{prefix}.{}.visible", self.name()))
    }

    /// Source marker attached to the visibility acknowledgments this app
    /// writes (`app.<name>.visibility`).
    #[must_use]
    pub fn visibility_source(&self) -> String {
        format!("app.{}.visibility", self.name())
    }

    /// Provision the visibility object at `<prefix>.<name>.visible`.
    ///
    /// Idempotent: when the object already exists nothing is written.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed `prefix` and propagates
    /// store failures unchanged.
    pub async fn create_objects(&self, prefix: &str) -> Result<(), PixelHubError> {
        let id = self.visibility_id(prefix)?;
        let created = self
            .store
            .set_object_not_exists(&id, visibility_object(self.name()))
            .await
            .inspect_err(|err| {
                tracing::error!(app = self.name(), id = %id, error = %err, "unable to provision visibility object");
            })?;

        if created {
            tracing::debug!(app = self.name(), id = %id, "visibility object created");
        }
        Ok(())
    }

    /// Tear the app down.
    ///
    /// With [`LifecycleOptions::remove_apps_on_stop`] set, the app is deleted
    /// from the device. That call is best-effort: failures are logged and
    /// swallowed. The bus subscription is released in every case.
    pub async fn unload(&self) {
        if self.options.remove_apps_on_stop {
            tracing::info!(app = self.name(), "deleting app from device");
            if let Err(err) = self.client.remove_app(self.name()).await {
                tracing::warn!(app = self.name(), error = %err, "unable to remove app from device");
            }
        }

        let dispatcher = self.lock_dispatcher().take();
        if let Some(dispatcher) = dispatcher {
            dispatcher.shutdown().await;
            tracing::debug!(app = self.name(), "app unsubscribed from change events");
        }
    }

    /// Handle one state change published on the bus.
    ///
    /// An unacknowledged change of `apps.<name>.visible` is a user toggling
    /// the app; it is confirmed by writing the same value back with
    /// `ack = true`. The variant hook then sees the original event, whatever
    /// its id or ack flag.
    ///
    /// # Errors
    ///
    /// Returns the write-back failure, if any, otherwise the hook's result.
    /// The hook runs even when the write-back failed.
    pub async fn handle_state_change(
        &self,
        id: &ObjectId,
        state: Option<&State>,
    ) -> Result<(), PixelHubError> {
        let relative = self.store.namespace().strip(id);
        let visibility = self.visibility_id(APPS_PREFIX)?;

        let written = match state {
            Some(state) if !state.ack && visibility == relative => {
                self.acknowledge_visibility(relative, state).await
            }
            _ => Ok(()),
        };

        let hooked = self.hooks.on_state_changed(id, state).await;
        written.and(hooked)
    }

    /// Handle one object change published on the bus.
    ///
    /// # Errors
    ///
    /// Propagates the hook's result.
    pub async fn handle_object_change(
        &self,
        id: &ObjectId,
        object: Option<&StoredObject>,
    ) -> Result<(), PixelHubError> {
        self.hooks.on_object_changed(id, object).await
    }

    async fn acknowledge_visibility(
        &self,
        relative: &str,
        state: &State,
    ) -> Result<(), PixelHubError> {
        tracing::debug!(app = self.name(), visible = %state.val, "changing app visibility");

        let target = ObjectId::new(relative)?;
        let confirmed = State::acknowledged(state.val.clone()).with_source(self.visibility_source());
        self.store
            .set_state(&target, confirmed)
            .await
            .inspect_err(|err| {
                tracing::error!(app = self.name(), id = %target, error = %err, "unable to acknowledge visibility");
            })
    }
}

impl<H, S, C> AppLifecycle<H, S, C> {
    fn lock_dispatcher(&self) -> std::sync::MutexGuard<'_, Option<Dispatcher>> {
        self.dispatcher
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<H, S, C> ChangeHandler for AppLifecycle<H, S, C>
where
    H: AppHooks + 'static,
    S: ObjectStore + 'static,
    C: AppClient + 'static,
{
    fn label(&self) -> &str {
        self.name()
    }

    async fn handle(&self, event: ChangeEvent) -> Result<(), PixelHubError> {
        match event {
            ChangeEvent::StateChanged { id, state } => {
                self.handle_state_change(&id, state.as_ref()).await
            }
            ChangeEvent::ObjectChanged { id, object } => {
                self.handle_object_change(&id, object.as_ref()).await
            }
        }
    }
}

/// The visibility switch every app exposes.
#[must_use]
pub fn visibility_object(app_name: &str) -> StoredObject {
    let name = LocalizedText::new("Visible")
        .with("de", "Sichtbar")
        .with("ru", "Видимый")
        .with("pt", "Visível")
        .with("nl", "Zichtbaar")
        .with("fr", "Visible")
        .with("it", "Visibile")
        .with("es", "Visible")
        .with("pl", "Widoczny")
        .with("zh-cn", "可见");

    StoredObject::state(ObjectCommon {
        name,
        value_type: ValueType::Boolean,
        role: "switch.enable".to_string(),
        read: true,
        write: true,
        def: Some(json!(true)),
    })
    .with_native("name", json!(app_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    use pixelhub_domain::error::{RemoteError, ValidationError};
    use pixelhub_domain::path::Namespace;
    use tokio::sync::mpsc;

    use crate::ports::EventPublisher;

    // ── In-memory object store ─────────────────────────────────────

    /// Records writes; publishes them on the bus when one is attached.
    struct MemoryStore {
        namespace: Namespace,
        objects: Mutex<HashMap<ObjectId, StoredObject>>,
        object_writes: Mutex<usize>,
        state_writes: Mutex<Vec<(ObjectId, State)>>,
        bus: Option<InProcessEventBus>,
        broken: bool,
    }

    impl MemoryStore {
        fn new() -> Self {
            Self {
                namespace: Namespace::new("pixelhub.0").unwrap(),
                objects: Mutex::new(HashMap::new()),
                object_writes: Mutex::new(0),
                state_writes: Mutex::new(Vec::new()),
                bus: None,
                broken: false,
            }
        }

        fn publishing_to(bus: &InProcessEventBus) -> Self {
            Self {
                bus: Some(bus.clone()),
                ..Self::new()
            }
        }

        fn broken() -> Self {
            Self {
                broken: true,
                ..Self::new()
            }
        }

        fn state_writes(&self) -> Vec<(ObjectId, State)> {
            self.state_writes.lock().unwrap().clone()
        }

        fn storage_failure() -> PixelHubError {
            PixelHubError::Storage(Box::new(std::io::Error::other("disk on fire")))
        }
    }

    impl ObjectStore for MemoryStore {
        fn namespace(&self) -> &Namespace {
            &self.namespace
        }

        async fn set_object_not_exists(
            &self,
            id: &ObjectId,
            object: StoredObject,
        ) -> Result<bool, PixelHubError> {
            if self.broken {
                return Err(Self::storage_failure());
            }
            let mut objects = self.objects.lock().unwrap();
            if objects.contains_key(id) {
                return Ok(false);
            }
            objects.insert(id.clone(), object);
            *self.object_writes.lock().unwrap() += 1;
            Ok(true)
        }

        async fn get_object(&self, id: &ObjectId) -> Result<Option<StoredObject>, PixelHubError> {
            Ok(self.objects.lock().unwrap().get(id).cloned())
        }

        async fn list_objects(
            &self,
            prefix: &str,
        ) -> Result<Vec<(ObjectId, StoredObject)>, PixelHubError> {
            Ok(self
                .objects
                .lock()
                .unwrap()
                .iter()
                .filter(|(id, _)| id.is_within(prefix))
                .map(|(id, obj)| (id.clone(), obj.clone()))
                .collect())
        }

        async fn delete_object(&self, id: &ObjectId) -> Result<(), PixelHubError> {
            self.objects.lock().unwrap().remove(id);
            Ok(())
        }

        async fn get_state(&self, id: &ObjectId) -> Result<Option<State>, PixelHubError> {
            Ok(self
                .state_writes
                .lock()
                .unwrap()
                .iter()
                .rev()
                .find(|(written, _)| written == id)
                .map(|(_, state)| state.clone()))
        }

        async fn set_state(&self, id: &ObjectId, state: State) -> Result<(), PixelHubError> {
            if self.broken {
                return Err(Self::storage_failure());
            }
            self.state_writes
                .lock()
                .unwrap()
                .push((id.clone(), state.clone()));
            if let Some(bus) = &self.bus {
                let full = self.namespace.qualify(id)?;
                bus.publish(ChangeEvent::StateChanged {
                    id: full,
                    state: Some(state),
                })
                .await?;
            }
            Ok(())
        }
    }

    // ── Recording remote client ────────────────────────────────────

    #[derive(Default)]
    struct RecordingClient {
        removed: Mutex<Vec<String>>,
        failing: bool,
    }

    impl AppClient for RecordingClient {
        async fn remove_app(&self, name: &str) -> Result<(), RemoteError> {
            self.removed.lock().unwrap().push(name.to_string());
            if self.failing {
                return Err(RemoteError::Rejected {
                    app: name.to_string(),
                    status: 404,
                });
            }
            Ok(())
        }

        async fn update_app(
            &self,
            _name: &str,
            _payload: &serde_json::Value,
        ) -> Result<(), RemoteError> {
            Ok(())
        }
    }

    // ── Recording hooks ────────────────────────────────────────────

    #[derive(Debug, Clone, PartialEq)]
    enum Seen {
        State(ObjectId, Option<State>),
        Object(ObjectId),
    }

    struct RecordingHooks {
        seen: mpsc::UnboundedSender<Seen>,
        calls: Mutex<Vec<Seen>>,
        failing: bool,
    }

    impl RecordingHooks {
        fn new() -> (Self, mpsc::UnboundedReceiver<Seen>) {
            let (tx, rx) = mpsc::unbounded_channel();
            let hooks = Self {
                seen: tx,
                calls: Mutex::new(Vec::new()),
                failing: false,
            };
            (hooks, rx)
        }

        fn record(&self, seen: Seen) {
            self.calls.lock().unwrap().push(seen.clone());
            let _ = self.seen.send(seen);
        }

        fn calls(&self) -> Vec<Seen> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl AppHooks for RecordingHooks {
        async fn on_state_changed(
            &self,
            id: &ObjectId,
            state: Option<&State>,
        ) -> Result<(), PixelHubError> {
            self.record(Seen::State(id.clone(), state.cloned()));
            if self.failing {
                return Err(ValidationError::EmptyPath.into());
            }
            Ok(())
        }

        async fn on_object_changed(
            &self,
            id: &ObjectId,
            _object: Option<&StoredObject>,
        ) -> Result<(), PixelHubError> {
            self.record(Seen::Object(id.clone()));
            Ok(())
        }
    }

    // ── Helpers ────────────────────────────────────────────────────

    type TestApp = AppLifecycle<RecordingHooks, MemoryStore, RecordingClient>;

    struct Fixture {
        app: Arc<TestApp>,
        store: Arc<MemoryStore>,
        client: Arc<RecordingClient>,
        bus: InProcessEventBus,
        seen: mpsc::UnboundedReceiver<Seen>,
    }

    fn fixture_with(
        name: &str,
        store: MemoryStore,
        client: RecordingClient,
        options: LifecycleOptions,
        bus: InProcessEventBus,
    ) -> Fixture {
        let (hooks, seen) = RecordingHooks::new();
        let store = Arc::new(store);
        let client = Arc::new(client);
        let app = AppLifecycle::new(
            AppDefinition::new(name).unwrap(),
            hooks,
            Arc::clone(&store),
            Arc::clone(&client),
            &bus,
            options,
        );
        Fixture {
            app,
            store,
            client,
            bus,
            seen,
        }
    }

    fn fixture(name: &str, options: LifecycleOptions) -> Fixture {
        fixture_with(
            name,
            MemoryStore::new(),
            RecordingClient::default(),
            options,
            InProcessEventBus::new(16),
        )
    }

    fn id(s: &str) -> ObjectId {
        ObjectId::new(s).unwrap()
    }

    async fn next_seen(rx: &mut mpsc::UnboundedReceiver<Seen>) -> Seen {
        tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("hook should be called")
            .expect("channel open")
    }

    const REMOVE_ON_STOP: LifecycleOptions = LifecycleOptions {
        remove_apps_on_stop: true,
    };

    // ── Naming & provisioning ──────────────────────────────────────

    #[tokio::test]
    async fn should_return_definition_name() {
        let fx = fixture("Weather", LifecycleOptions::default());
        assert_eq!(fx.app.name(), "Weather");
        assert_eq!(fx.app.definition().name(), "Weather");
    }

    #[tokio::test]
    async fn should_run_default_init_without_error() {
        let fx = fixture("Weather", LifecycleOptions::default());
        assert!(fx.app.init().await.is_ok());
    }

    #[tokio::test]
    async fn should_provision_visibility_object_under_prefix() {
        let fx = fixture("Weather", LifecycleOptions::default());

        fx.app.create_objects("apps").await.unwrap();

        let object = fx
            .store
            .get_object(&id("apps.Weather.visible"))
            .await
            .unwrap()
            .expect("object should exist");
        assert_eq!(object.common.value_type, ValueType::Boolean);
        assert_eq!(object.common.role, "switch.enable");
        assert!(object.common.read);
        assert!(object.common.write);
        assert_eq!(object.common.def, Some(json!(true)));
        assert_eq!(object.common.name.get("en"), Some("Visible"));
        assert_eq!(object.native.get("name"), Some(&json!("Weather")));
    }

    #[tokio::test]
    async fn should_provision_only_once_when_called_twice() {
        let fx = fixture("Weather", LifecycleOptions::default());

        fx.app.create_objects("apps").await.unwrap();
        fx.app.create_objects("apps").await.unwrap();

        assert_eq!(*fx.store.object_writes.lock().unwrap(), 1);
        let listed = fx.store.list_objects("apps").await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn should_propagate_provisioning_failure() {
        let fx = fixture_with(
            "Weather",
            MemoryStore::broken(),
            RecordingClient::default(),
            LifecycleOptions::default(),
            InProcessEventBus::new(16),
        );

        let result = fx.app.create_objects("apps").await;

        assert!(matches!(result, Err(PixelHubError::Storage(_))));
    }

    #[tokio::test]
    async fn should_reject_malformed_prefix() {
        let fx = fixture("Weather", LifecycleOptions::default());
        let result = fx.app.create_objects("apps.").await;
        assert!(matches!(result, Err(PixelHubError::Validation(_))));
    }

    // ── State dispatch ─────────────────────────────────────────────

    #[tokio::test]
    async fn should_acknowledge_unacknowledged_visibility_toggle() {
        let fx = fixture("Weather", LifecycleOptions::default());
        let full = id("pixelhub.0.apps.Weather.visible");

        fx.app
            .handle_state_change(&full, Some(&State::request(json!(false))))
            .await
            .unwrap();

        let writes = fx.store.state_writes();
        assert_eq!(writes.len(), 1);
        let (written_id, written) = &writes[0];
        assert_eq!(written_id, &"apps.Weather.visible");
        assert_eq!(written.val, json!(false));
        assert!(written.ack);
        assert_eq!(written.source.as_deref(), Some("app.Weather.visibility"));
    }

    #[tokio::test]
    async fn should_not_write_back_acknowledged_visibility_change() {
        let fx = fixture("Weather", LifecycleOptions::default());
        let full = id("pixelhub.0.apps.Weather.visible");

        fx.app
            .handle_state_change(&full, Some(&State::acknowledged(json!(false))))
            .await
            .unwrap();

        assert!(fx.store.state_writes().is_empty());
    }

    #[tokio::test]
    async fn should_ignore_visibility_of_other_apps() {
        let fx = fixture("Weather", LifecycleOptions::default());

        fx.app
            .handle_state_change(
                &id("pixelhub.0.apps.Clock.visible"),
                Some(&State::request(json!(false))),
            )
            .await
            .unwrap();

        assert!(fx.store.state_writes().is_empty());
    }

    #[tokio::test]
    async fn should_ignore_deleted_visibility_state() {
        let fx = fixture("Weather", LifecycleOptions::default());

        fx.app
            .handle_state_change(&id("pixelhub.0.apps.Weather.visible"), None)
            .await
            .unwrap();

        assert!(fx.store.state_writes().is_empty());
        assert_eq!(
            fx.app.hooks().calls(),
            vec![Seen::State(id("pixelhub.0.apps.Weather.visible"), None)]
        );
    }

    #[tokio::test]
    async fn should_call_hook_once_with_original_event_whatever_the_path() {
        let fx = fixture("Weather", LifecycleOptions::default());
        let cases = [
            ("pixelhub.0.apps.Weather.visible", State::request(json!(true))),
            ("pixelhub.0.apps.Weather.visible", State::acknowledged(json!(true))),
            ("pixelhub.0.apps.Clock.text", State::request(json!("hi"))),
            ("pixelhub.0.settings.brightness", State::acknowledged(json!(40))),
        ];

        for (path, state) in &cases {
            fx.app
                .handle_state_change(&id(path), Some(state))
                .await
                .unwrap();
        }

        let expected: Vec<Seen> = cases
            .iter()
            .map(|(path, state)| Seen::State(id(path), Some(state.clone())))
            .collect();
        assert_eq!(fx.app.hooks().calls(), expected);
    }

    #[tokio::test]
    async fn should_call_hook_even_when_write_back_fails() {
        let fx = fixture_with(
            "Weather",
            MemoryStore::broken(),
            RecordingClient::default(),
            LifecycleOptions::default(),
            InProcessEventBus::new(16),
        );
        let full = id("pixelhub.0.apps.Weather.visible");

        let result = fx
            .app
            .handle_state_change(&full, Some(&State::request(json!(false))))
            .await;

        assert!(matches!(result, Err(PixelHubError::Storage(_))));
        assert_eq!(fx.app.hooks().calls().len(), 1);
    }

    #[tokio::test]
    async fn should_forward_every_object_change() {
        let fx = fixture("Weather", LifecycleOptions::default());

        fx.app
            .handle_object_change(&id("pixelhub.0.apps.Clock.visible"), None)
            .await
            .unwrap();
        fx.app
            .handle_object_change(
                &id("pixelhub.0.apps.Weather.visible"),
                Some(&visibility_object("Weather")),
            )
            .await
            .unwrap();

        assert_eq!(
            fx.app.hooks().calls(),
            vec![
                Seen::Object(id("pixelhub.0.apps.Clock.visible")),
                Seen::Object(id("pixelhub.0.apps.Weather.visible")),
            ]
        );
    }

    // ── Bus-driven dispatch ────────────────────────────────────────

    #[tokio::test]
    async fn should_dispatch_bus_events_inside_namespace_only() {
        let mut fx = fixture("Weather", LifecycleOptions::default());

        fx.bus
            .publish(ChangeEvent::ObjectChanged {
                id: id("other.0.apps.Weather.visible"),
                object: None,
            })
            .await
            .unwrap();
        fx.bus
            .publish(ChangeEvent::ObjectChanged {
                id: id("pixelhub.0.apps.Weather.visible"),
                object: None,
            })
            .await
            .unwrap();

        assert_eq!(
            next_seen(&mut fx.seen).await,
            Seen::Object(id("pixelhub.0.apps.Weather.visible"))
        );
    }

    #[tokio::test]
    async fn should_keep_dispatching_after_hook_failure() {
        let (mut hooks, mut seen) = RecordingHooks::new();
        hooks.failing = true;
        let bus = InProcessEventBus::new(16);
        let app = AppLifecycle::new(
            AppDefinition::new("Weather").unwrap(),
            hooks,
            Arc::new(MemoryStore::new()),
            Arc::new(RecordingClient::default()),
            &bus,
            LifecycleOptions::default(),
        );

        for path in ["pixelhub.0.a", "pixelhub.0.b"] {
            bus.publish(ChangeEvent::StateChanged {
                id: id(path),
                state: None,
            })
            .await
            .unwrap();
        }

        assert_eq!(next_seen(&mut seen).await, Seen::State(id("pixelhub.0.a"), None));
        assert_eq!(next_seen(&mut seen).await, Seen::State(id("pixelhub.0.b"), None));
        assert!(app.is_subscribed());
    }

    // ── Unload ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn should_not_contact_device_when_removal_disabled() {
        let fx = fixture("Weather", LifecycleOptions::default());

        fx.app.unload().await;

        assert!(fx.client.removed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_remove_app_once_when_removal_enabled() {
        let fx = fixture("Weather", REMOVE_ON_STOP);

        fx.app.unload().await;

        assert_eq!(*fx.client.removed.lock().unwrap(), vec!["Weather"]);
    }

    #[tokio::test]
    async fn should_swallow_removal_failure() {
        let fx = fixture_with(
            "Weather",
            MemoryStore::new(),
            RecordingClient {
                failing: true,
                ..RecordingClient::default()
            },
            REMOVE_ON_STOP,
            InProcessEventBus::new(16),
        );

        fx.app.unload().await;

        assert_eq!(fx.client.removed.lock().unwrap().len(), 1);
        assert!(!fx.app.is_subscribed());
    }

    #[tokio::test]
    async fn should_release_subscription_on_unload() {
        let fx = fixture("Weather", LifecycleOptions::default());
        assert!(fx.app.is_subscribed());
        assert_eq!(fx.bus.subscriber_count(), 1);

        fx.app.unload().await;

        assert!(!fx.app.is_subscribed());
        assert_eq!(fx.bus.subscriber_count(), 0);
    }

    // ── End-to-end scenario ────────────────────────────────────────

    #[tokio::test]
    async fn should_toggle_weather_visibility_and_remove_on_unload() {
        let bus = InProcessEventBus::new(16);
        let mut fx = fixture_with(
            "Weather",
            MemoryStore::publishing_to(&bus),
            RecordingClient {
                failing: true,
                ..RecordingClient::default()
            },
            REMOVE_ON_STOP,
            bus,
        );
        let full = id("pixelhub.0.apps.Weather.visible");

        fx.app.create_objects("apps").await.unwrap();
        let object = fx
            .store
            .get_object(&id("apps.Weather.visible"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(object.common.def, Some(json!(true)));

        let request = State::request(json!(false));
        fx.bus
            .publish(ChangeEvent::StateChanged {
                id: full.clone(),
                state: Some(request.clone()),
            })
            .await
            .unwrap();

        // the user request, then the echo of the acknowledgment
        assert_eq!(
            next_seen(&mut fx.seen).await,
            Seen::State(full.clone(), Some(request))
        );
        let Seen::State(echo_id, Some(echo)) = next_seen(&mut fx.seen).await else {
            panic!("expected the acknowledged echo");
        };
        assert_eq!(echo_id, full);
        assert!(echo.ack);
        assert_eq!(echo.val, json!(false));

        let writes = fx.store.state_writes();
        assert_eq!(writes.len(), 1);
        assert!(writes[0].1.ack);

        fx.app.unload().await;
        assert_eq!(*fx.client.removed.lock().unwrap(), vec!["Weather"]);
    }
}
