use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::message::Message;

type ResumableFn = dyn Fn(&Message) -> Resumption + Send + Sync;
type PlainFn = dyn Fn(&Message) + Send + Sync;
type PositionalFn = dyn Fn(&[Value]) + Send + Sync;

#[derive(Clone)]
enum Shape {
    Resumable(Arc<ResumableFn>),
    Plain(Arc<PlainFn>),
    Positional(Arc<PositionalFn>),
}

/// A handler function with an explicit shape and parameter count.
///
/// Command handlers must be resumable: invoking one hands back a
/// [`Resumption`] that the caller drives step by step. Event handlers may be
/// any shape.
#[derive(Clone)]
pub struct Handler {
    arity: usize,
    shape: Shape,
}

impl Handler {
    /// A handler that returns a resumable sequence of steps.
    pub fn resumable<F>(handler: F) -> Self
    where
        F: Fn(&Message) -> Resumption + Send + Sync + 'static,
    {
        Handler {
            arity: 1,
            shape: Shape::Resumable(Arc::new(handler)),
        }
    }

    /// A plain synchronous handler taking the whole message.
    pub fn plain<F>(handler: F) -> Self
    where
        F: Fn(&Message) + Send + Sync + 'static,
    {
        Handler {
            arity: 1,
            shape: Shape::Plain(Arc::new(handler)),
        }
    }

    /// A plain handler that receives the message's field values positionally.
    pub fn positional<F>(arity: usize, handler: F) -> Self
    where
        F: Fn(&[Value]) + Send + Sync + 'static,
    {
        Handler {
            arity,
            shape: Shape::Positional(Arc::new(handler)),
        }
    }

    /// Declared parameter count.
    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn is_resumable(&self) -> bool {
        matches!(self.shape, Shape::Resumable(_))
    }

    /// Call the handler with a message.
    ///
    /// Resumable handlers are not driven here: their steps come back inside
    /// [`Delivery::Suspended`].
    pub fn invoke(&self, message: &Message) -> Delivery {
        match &self.shape {
            Shape::Resumable(handler) => Delivery::Suspended(handler(message)),
            Shape::Plain(handler) => {
                handler(message);
                Delivery::Completed
            }
            Shape::Positional(handler) => {
                handler(&message.values());
                Delivery::Completed
            }
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = match self.shape {
            Shape::Resumable(_) => "resumable",
            Shape::Plain(_) => "plain",
            Shape::Positional(_) => "positional",
        };
        f.debug_struct("Handler")
            .field("shape", &shape)
            .field("arity", &self.arity)
            .finish()
    }
}

/// The paused remainder of a resumable handler.
///
/// Each call to [`resume`](Self::resume) runs the handler up to its next
/// step and yields the message produced there, usually an event.
pub struct Resumption {
    steps: Box<dyn Iterator<Item = Message>>,
}

impl Resumption {
    pub fn new<I>(steps: I) -> Self
    where
        I: IntoIterator<Item = Message>,
        I::IntoIter: 'static,
    {
        Resumption {
            steps: Box::new(steps.into_iter()),
        }
    }

    /// Resume by calling `step` until it returns `None`.
    pub fn from_fn<F>(step: F) -> Self
    where
        F: FnMut() -> Option<Message> + 'static,
    {
        Self::new(std::iter::from_fn(step))
    }

    /// A handler that finishes without yielding.
    pub fn done() -> Self {
        Self::new(std::iter::empty())
    }

    pub fn resume(&mut self) -> Option<Message> {
        self.steps.next()
    }
}

impl Iterator for Resumption {
    type Item = Message;

    fn next(&mut self) -> Option<Message> {
        self.resume()
    }
}

impl fmt::Debug for Resumption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resumption").finish_non_exhaustive()
    }
}

/// Outcome of sending a message to a handler.
#[derive(Debug)]
pub enum Delivery {
    /// No handler was bound for the message.
    Unrouted,
    /// A plain handler ran to completion.
    Completed,
    /// A resumable handler was started; the caller drives the rest.
    Suspended(Resumption),
}

impl Delivery {
    pub fn is_unrouted(&self) -> bool {
        matches!(self, Delivery::Unrouted)
    }

    /// Drive a suspended handler to the end, collecting every step.
    pub fn run_to_end(self) -> Vec<Message> {
        match self {
            Delivery::Suspended(resumption) => resumption.collect(),
            Delivery::Unrouted | Delivery::Completed => Vec::new(),
        }
    }
}
