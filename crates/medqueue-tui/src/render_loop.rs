//! Render Loop: the store subscriber that rebuilds the document
//!
//! Every notification throws the mounted tree away and builds a fresh one
//! from state. Focus and the text selection are carried across by key, so
//! typing into an input behaves as if only that input had changed.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Local};
use medqueue_app::config::IconMode;
use medqueue_app::{AppState, Store};
use tracing::{trace, warn};

use crate::theme::icons::IconSet;
use crate::view::Document;
use crate::views;

pub type SharedRenderLoop = Rc<RefCell<RenderLoop>>;

#[derive(Debug)]
pub struct RenderLoop {
    document: Document,
    icons: IconSet,
    title: String,
    renders: u64,
}

impl RenderLoop {
    pub fn new(icons: IconMode) -> Self {
        Self {
            document: Document::new(),
            icons: IconSet::new(icons),
            title: String::new(),
            renders: 0,
        }
    }

    /// Rebuild the document for `state`
    pub fn render(&mut self, state: &AppState) {
        self.render_at(state, Local::now());
    }

    pub fn render_at(&mut self, state: &AppState, now: DateTime<Local>) {
        let snapshot = self.document.capture();

        self.document.clear();
        self.document.mount(views::resolve_at(state, now));
        self.title = views::title(state);

        let restored = snapshot
            .as_ref()
            .is_some_and(|snapshot| self.document.restore(snapshot));
        if !restored {
            if let Some(key) = self.document.autofocus_key() {
                self.document.focus(&key);
            }
        }

        if let Some(root) = self.document.root_mut() {
            self.icons.apply(root);
        }

        self.renders += 1;
        trace!(
            "render #{} on {:?}, focus {:?}",
            self.renders,
            state.screen,
            self.document.focused_key()
        );
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Number of renders so far
    pub fn renders(&self) -> u64 {
        self.renders
    }
}

/// Render `store`'s current state once and subscribe a render loop to it
pub fn attach(store: &mut Store, icons: IconMode) -> SharedRenderLoop {
    let render_loop = Rc::new(RefCell::new(RenderLoop::new(icons)));
    render_loop.borrow_mut().render(store.state());

    let subscriber = Rc::clone(&render_loop);
    store.subscribe(move |state| match subscriber.try_borrow_mut() {
        Ok(mut render_loop) => render_loop.render(state),
        Err(_) => warn!("render loop busy, skipped a render"),
    });
    render_loop
}
