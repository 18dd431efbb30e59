//! Notificador de cambios del store
//!
//! Canal publish/subscribe con un único publicador (el `EntityStore`).
//! Cada mutación publica la colección completa afectada; nunca diffs
//! parciales. La entrega es síncrona: cuando `publish` retorna, todos los
//! callbacks se ejecutaron y todos los canales recibieron el evento.

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::models::{Driver, Route};

/// Evento publicado tras cada mutación exitosa
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    Drivers(Arc<Vec<Driver>>),
    Routes(Arc<Vec<Route>>),
}

/// Identificador devuelto al suscribirse
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

enum Subscriber {
    /// Se ejecuta dentro de la llamada que mutó el store
    Callback(Box<dyn FnMut(&StoreEvent) + Send>),
    /// Encola el evento; el receptor lo procesa después de que la mutación retorne
    Channel(UnboundedSender<StoreEvent>),
}

/// Lista de observadores del store
#[derive(Default)]
pub struct ChangeNotifier {
    subscribers: BTreeMap<SubscriptionId, Subscriber>,
    next_id: u64,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registrar un callback síncrono
    ///
    /// El callback recibe el evento mientras el store está prestado de forma
    /// exclusiva, así que no puede volver a mutarlo. Quien necesite reaccionar
    /// con nuevas mutaciones debe usar `subscribe_channel`.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&StoreEvent) + Send + 'static,
    {
        self.register(Subscriber::Callback(Box::new(callback)))
    }

    /// Registrar un suscriptor basado en canal
    pub fn subscribe_channel(&mut self) -> (SubscriptionId, UnboundedReceiver<StoreEvent>) {
        let (tx, rx) = unbounded_channel();
        let id = self.register(Subscriber::Channel(tx));
        (id, rx)
    }

    /// Dar de baja un suscriptor; devuelve si existía
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(&id).is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Entregar el evento a todos los suscriptores actuales, en orden de alta
    ///
    /// Los canales cuyo receptor se cerró se eliminan de la lista.
    pub fn publish(&mut self, event: StoreEvent) {
        let mut closed = Vec::new();

        for (id, subscriber) in self.subscribers.iter_mut() {
            match subscriber {
                Subscriber::Callback(callback) => callback(&event),
                Subscriber::Channel(tx) => {
                    if tx.send(event.clone()).is_err() {
                        closed.push(*id);
                    }
                }
            }
        }

        for id in closed {
            debug!("🔌 Suscriptor {:?} cerrado, eliminándolo", id);
            self.subscribers.remove(&id);
        }

        debug!(
            "📣 Evento {} entregado a {} suscriptores",
            event_label(&event),
            self.subscribers.len()
        );
    }

    fn register(&mut self, subscriber: Subscriber) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.insert(id, subscriber);
        id
    }
}

fn event_label(event: &StoreEvent) -> &'static str {
    match event {
        StoreEvent::Drivers(_) => "drivers",
        StoreEvent::Routes(_) => "routes",
    }
}
