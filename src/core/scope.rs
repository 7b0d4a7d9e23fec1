//! Ambient logging scopes
//!
//! This module provides:
//! - `ScopeNode`: one `(name, state)` frame linked to its enclosing frame
//! - `ScopeChain`: access to the ambient "current" frame
//! - `ScopeGuard`: RAII guard that restores the enclosing frame on drop
//! - `Scoped`: future adapter carrying a task's own chain across polls
//!
//! The current frame lives in thread-local storage. A plain thread sees
//! exactly the scopes it pushed. Futures wrapped with
//! [`ScopedFutureExt::with_current_scope`] capture the creator's frame and
//! install their own chain for the duration of each poll, so the chain
//! follows the logical call across `.await` points and worker threads while
//! unrelated tasks sharing a thread never observe it.
//!
//! A future that is *not* wrapped and holds a [`ScopeGuard`] across an
//! `.await` leaves its frame installed on the worker thread while it is
//! parked, where other unwrapped tasks on that thread can see it. Wrap
//! spawned futures that open scopes.

use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

thread_local! {
    static CURRENT: RefCell<Option<Arc<ScopeNode>>> = const { RefCell::new(None) };
}

fn replace_current(scope: Option<Arc<ScopeNode>>) -> Option<Arc<ScopeNode>> {
    CURRENT.with(|current| current.replace(scope))
}

/// One frame of the ambient scope chain.
pub struct ScopeNode {
    name: String,
    state: Box<dyn fmt::Display + Send + Sync>,
    parent: Option<Arc<ScopeNode>>,
}

impl ScopeNode {
    /// Name of the logger that opened this scope
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> &(dyn fmt::Display + Send + Sync) {
        self.state.as_ref()
    }

    pub fn parent(&self) -> Option<&Arc<ScopeNode>> {
        self.parent.as_ref()
    }

    /// Walk from this frame out to the outermost one.
    pub fn iter(&self) -> ScopeIter<'_> {
        ScopeIter { next: Some(self) }
    }

    pub fn depth(&self) -> usize {
        self.iter().count()
    }

    /// Render every frame's state, outermost first, joined by `separator`.
    ///
    /// ```
    /// use rust_memory_logger::ScopeChain;
    ///
    /// let _outer = ScopeChain::push("app", "request 7");
    /// let _inner = ScopeChain::push("app", "db");
    /// let current = ScopeChain::current().unwrap();
    /// assert_eq!(current.path(" > "), "request 7 > db");
    /// ```
    pub fn path(&self, separator: &str) -> String {
        let mut states: Vec<String> = self.iter().map(|node| node.state.to_string()).collect();
        states.reverse();
        states.join(separator)
    }
}

impl fmt::Display for ScopeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.state)
    }
}

impl fmt::Debug for ScopeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeNode")
            .field("name", &self.name)
            .field("state", &self.state.to_string())
            .field("depth", &self.depth())
            .finish()
    }
}

pub struct ScopeIter<'a> {
    next: Option<&'a ScopeNode>,
}

impl<'a> Iterator for ScopeIter<'a> {
    type Item = &'a ScopeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.parent.as_deref();
        Some(node)
    }
}

/// Entry point to the ambient scope chain.
pub struct ScopeChain;

impl ScopeChain {
    /// Open a scope on top of the current one.
    ///
    /// The returned guard must be dropped in the same logical context,
    /// innermost first; dropping it reinstates the frame that was current
    /// when this scope was pushed.
    pub fn push<S>(name: impl Into<String>, state: S) -> ScopeGuard
    where
        S: fmt::Display + Send + Sync + 'static,
    {
        let parent = Self::current();
        let node = Arc::new(ScopeNode {
            name: name.into(),
            state: Box::new(state),
            parent: parent.clone(),
        });
        replace_current(Some(Arc::clone(&node)));
        ScopeGuard {
            installed: node,
            previous: parent,
        }
    }

    /// Innermost scope of the current logical context, if any.
    pub fn current() -> Option<Arc<ScopeNode>> {
        CURRENT.with(|current| current.borrow().clone())
    }

    /// Run `future` with the chain that is current right now.
    pub fn bind<F: Future>(future: F) -> Scoped<F> {
        Scoped {
            inner: Box::pin(future),
            scope: Self::current(),
        }
    }
}

/// RAII guard for an open scope
///
/// ```
/// use rust_memory_logger::ScopeChain;
///
/// {
///     let _guard = ScopeChain::push("worker", "job 42");
///     assert!(ScopeChain::current().is_some());
/// }
/// assert!(ScopeChain::current().is_none());
/// ```
#[must_use = "the scope closes as soon as the guard is dropped"]
pub struct ScopeGuard {
    installed: Arc<ScopeNode>,
    previous: Option<Arc<ScopeNode>>,
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        // Only pop our own frame; a guard dropped in another context must
        // not overwrite that context's chain.
        let restored = CURRENT.with(|current| {
            let mut current = current.borrow_mut();
            let ours = current
                .as_ref()
                .is_some_and(|node| Arc::ptr_eq(node, &self.installed));
            if ours {
                *current = self.previous.take();
            }
            ours
        });

        if !restored {
            eprintln!(
                "[LOGGER WARNING] Scope '{}' released outside the context that opened it; ambient scope left unchanged",
                self.installed.name()
            );
        }
    }
}

impl fmt::Debug for ScopeGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeGuard")
            .field("scope", &self.installed)
            .finish_non_exhaustive()
    }
}

/// Future carrying its own scope chain.
pub struct Scoped<F> {
    inner: Pin<Box<F>>,
    scope: Option<Arc<ScopeNode>>,
}

struct PollRestore<'a> {
    slot: &'a mut Option<Arc<ScopeNode>>,
    outer: Option<Arc<ScopeNode>>,
}

impl Drop for PollRestore<'_> {
    fn drop(&mut self) {
        *self.slot = replace_current(self.outer.take());
    }
}

impl<F: Future> Future for Scoped<F> {
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let outer = replace_current(this.scope.take());
        let _restore = PollRestore {
            slot: &mut this.scope,
            outer,
        };
        this.inner.as_mut().poll(cx)
    }
}

pub trait ScopedFutureExt: Future + Sized {
    /// Attach the caller's current scope chain to this future.
    fn with_current_scope(self) -> Scoped<Self> {
        ScopeChain::bind(self)
    }
}

impl<F: Future> ScopedFutureExt for F {}

#[cfg(test)]
mod tests {
    use super::*;

    fn current_state() -> Option<String> {
        ScopeChain::current().map(|node| node.to_string())
    }

    #[test]
    fn test_push_and_release() {
        assert!(ScopeChain::current().is_none());
        {
            let _guard = ScopeChain::push("test", "outer");
            assert_eq!(current_state().as_deref(), Some("outer"));
        }
        assert!(ScopeChain::current().is_none());
    }

    #[test]
    fn test_nested_lifo_release() {
        let first = ScopeChain::push("test", 1);
        let second = ScopeChain::push("test", 2);
        let third = ScopeChain::push("test", 3);

        let current = ScopeChain::current().unwrap();
        assert_eq!(current.depth(), 3);
        assert_eq!(current.path(" > "), "1 > 2 > 3");

        drop(third);
        assert_eq!(current_state().as_deref(), Some("2"));
        drop(second);
        assert_eq!(current_state().as_deref(), Some("1"));
        drop(first);
        assert!(ScopeChain::current().is_none());
    }

    #[test]
    fn test_released_on_panic() {
        let result = std::panic::catch_unwind(|| {
            let _guard = ScopeChain::push("test", "doomed");
            panic!("boom");
        });
        assert!(result.is_err());
        assert!(ScopeChain::current().is_none());
    }

    #[test]
    fn test_threads_do_not_share_scopes() {
        let _guard = ScopeChain::push("main", "main-thread");

        let seen = std::thread::spawn(|| {
            let before = current_state();
            let _inner = ScopeChain::push("worker", "worker-thread");
            (before, current_state())
        })
        .join()
        .unwrap();

        assert_eq!(seen, (None, Some("worker-thread".to_string())));
        assert_eq!(current_state().as_deref(), Some("main-thread"));
    }

    #[test]
    fn test_node_accessors() {
        let _outer = ScopeChain::push("Http", "GET /");
        let _inner = ScopeChain::push("Db", "query");

        let current = ScopeChain::current().unwrap();
        assert_eq!(current.name(), "Db");
        assert_eq!(current.parent().map(|p| p.name()), Some("Http"));
        let names: Vec<&str> = current.iter().map(ScopeNode::name).collect();
        assert_eq!(names, vec!["Db", "Http"]);
    }

    #[tokio::test]
    async fn test_bound_future_keeps_its_chain_across_await() {
        let _guard = ScopeChain::push("test", "request");

        let task = async {
            tokio::task::yield_now().await;
            let _inner = ScopeChain::push("test", "handler");
            tokio::task::yield_now().await;
            ScopeChain::current().map(|node| node.path("/"))
        }
        .with_current_scope();

        assert_eq!(task.await.as_deref(), Some("request/handler"));
        assert_eq!(current_state().as_deref(), Some("request"));
    }

    #[test]
    fn test_guard_dropped_on_other_thread_leaves_scope_alone() {
        let guard = std::thread::spawn(|| {
            let base = ScopeChain::push("worker", "thread-x-base");
            let guard = ScopeChain::push("worker", "thread-x-inner");
            std::mem::forget(base);
            guard
        })
        .join()
        .unwrap();

        assert!(ScopeChain::current().is_none());
        drop(guard);
        assert!(ScopeChain::current().is_none());

        let _mine = ScopeChain::push("main", "main-frame");
        assert_eq!(current_state().as_deref(), Some("main-frame"));
    }

    #[test]
    fn test_foreign_guard_does_not_pop_current_frame() {
        let foreign = std::thread::spawn(|| ScopeChain::push("worker", "elsewhere"))
            .join()
            .unwrap();

        let _outer = ScopeChain::push("main", "outer");
        drop(foreign);
        assert_eq!(current_state().as_deref(), Some("outer"));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_wrapped_tasks_isolated_on_one_thread() {
        let (parked_tx, parked_rx) = tokio::sync::oneshot::channel::<()>();
        let (resume_tx, resume_rx) = tokio::sync::oneshot::channel::<()>();

        let task_a = tokio::spawn(
            async move {
                let _scope = ScopeChain::push("a", "task-a");
                parked_tx.send(()).unwrap();
                resume_rx.await.unwrap();
                current_state()
            }
            .with_current_scope(),
        );
        let task_b = tokio::spawn(
            async move {
                parked_rx.await.unwrap();
                let seen = current_state();
                resume_tx.send(()).unwrap();
                seen
            }
            .with_current_scope(),
        );

        assert_eq!(task_b.await.unwrap(), None);
        assert_eq!(task_a.await.unwrap().as_deref(), Some("task-a"));
        assert!(ScopeChain::current().is_none());
    }

    // Unwrapped futures share the worker thread's slot while parked
    #[tokio::test(flavor = "current_thread")]
    async fn test_unwrapped_task_frame_visible_while_parked() {
        let (parked_tx, parked_rx) = tokio::sync::oneshot::channel::<()>();
        let (resume_tx, resume_rx) = tokio::sync::oneshot::channel::<()>();

        let task_a = tokio::spawn(async move {
            let _scope = ScopeChain::push("a", "task-a");
            parked_tx.send(()).unwrap();
            resume_rx.await.unwrap();
        });
        let task_b = tokio::spawn(async move {
            parked_rx.await.unwrap();
            let seen = current_state();
            resume_tx.send(()).unwrap();
            seen
        });

        assert_eq!(task_b.await.unwrap().as_deref(), Some("task-a"));
        task_a.await.unwrap();
        // Dropped on the thread that still holds its frame, so it is popped
        assert!(ScopeChain::current().is_none());
    }
}
