//! File selection and validation state machine.
//!
//! Four phases, three external event kinds, no concurrency. The front end
//! (the CLI event loop, or anything else) feeds [`UiEvent`]s into
//! [`Selection::handle`] and interprets the returned [`Effect`]s — enable
//! or disable controls, show a preview, start the conversion. Keeping the
//! transitions pure (descriptors in, effects out) makes every rule in the
//! table below unit-testable without a UI:
//!
//! - source change: re-derive the descriptor; valid ⇒ enable the target
//!   field, auto-populate `<stem>_ocr.pdf`, request a preview; invalid ⇒
//!   disable target and convert.
//! - target change: re-derive the descriptor only.
//! - after either: convert is enabled iff both descriptors are valid.
//! - convert requested while ready: fill a missing target directory from
//!   the source, then hand both paths to the pipeline and exit the loop.
//! - cancel: exit the loop without converting.

use crate::fileinfo::{FileDescriptor, SOURCE_EXTENSIONS, TARGET_EXTENSIONS};

/// Where the selection currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPhase {
    /// No source has ever been entered.
    NoSource,
    /// A source was entered but its descriptor is invalid.
    SourceInvalid,
    /// Source is valid; target is missing or invalid.
    SourceValidNoTarget,
    /// Both descriptors are valid; conversion may start.
    Ready,
}

/// External events driving the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// The source path input changed.
    SourceChanged(String),
    /// The target path input changed.
    TargetChanged(String),
    /// The convert action was triggered.
    ConvertRequested,
    /// Cancel or window close.
    Cancelled,
}

/// Instructions for the front end, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Enable the target input and pre-fill it with the default name.
    EnableTarget { default_name: String },
    /// Disable the target input.
    DisableTarget,
    /// Enable or disable the convert action.
    SetConvertEnabled(bool),
    /// Generate and show a preview of the given (valid) source.
    RenderPreview(FileDescriptor),
    /// Lock the inputs and run the pipeline, then exit the loop.
    BeginConversion {
        source: FileDescriptor,
        target: FileDescriptor,
    },
    /// Leave the event loop without converting.
    Exit,
}

/// The event loop's only mutable state: the two current descriptors.
#[derive(Debug, Default)]
pub struct Selection {
    source: Option<FileDescriptor>,
    target: Option<FileDescriptor>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase, derived from descriptor validity.
    pub fn phase(&self) -> SelectionPhase {
        match (&self.source, &self.target) {
            (None, _) => SelectionPhase::NoSource,
            (Some(s), _) if !s.is_valid(SOURCE_EXTENSIONS) => SelectionPhase::SourceInvalid,
            (Some(_), Some(t)) if t.is_valid(TARGET_EXTENSIONS) => SelectionPhase::Ready,
            (Some(_), _) => SelectionPhase::SourceValidNoTarget,
        }
    }

    /// Whether the convert action is currently enabled.
    pub fn convert_enabled(&self) -> bool {
        self.phase() == SelectionPhase::Ready
    }

    pub fn source(&self) -> Option<&FileDescriptor> {
        self.source.as_ref()
    }

    pub fn target(&self) -> Option<&FileDescriptor> {
        self.target.as_ref()
    }

    /// Apply one event and return the effects the front end must perform.
    pub fn handle(&mut self, event: UiEvent) -> Vec<Effect> {
        let mut effects = Vec::new();

        match event {
            UiEvent::SourceChanged(raw) => {
                let descriptor = FileDescriptor::parse(&raw);
                // unchanged source: nothing to re-derive, nothing to emit
                if self.source.as_ref() == Some(&descriptor) {
                    return effects;
                }

                if descriptor.is_valid(SOURCE_EXTENSIONS) {
                    let default_name = descriptor.default_target_name();
                    self.target = Some(FileDescriptor::parse(&default_name));
                    effects.push(Effect::RenderPreview(descriptor.clone()));
                    effects.push(Effect::EnableTarget { default_name });
                } else {
                    effects.push(Effect::DisableTarget);
                }
                self.source = Some(descriptor);
                effects.push(Effect::SetConvertEnabled(self.convert_enabled()));
            }

            UiEvent::TargetChanged(raw) => {
                let descriptor = FileDescriptor::parse(&raw);
                if self.target.as_ref() != Some(&descriptor) {
                    self.target = Some(descriptor);
                }
                effects.push(Effect::SetConvertEnabled(self.convert_enabled()));
            }

            UiEvent::ConvertRequested => {
                if self.phase() != SelectionPhase::Ready {
                    // the action is disabled in this phase; ignore strays
                    return effects;
                }
                let source = self.source.clone().unwrap();
                let mut target = self.target.clone().unwrap();
                if target.dir().as_os_str().is_empty() {
                    target = target.with_dir(source.dir());
                    self.target = Some(target.clone());
                }
                effects.push(Effect::BeginConversion { source, target });
                effects.push(Effect::Exit);
            }

            UiEvent::Cancelled => {
                effects.push(Effect::Exit);
            }
        }

        effects
    }
}
