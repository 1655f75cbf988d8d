//! Simulation input registry
//!
//! Each ocean simulation (waves, foam, flow and so on) is fed by inputs
//! scattered across the world: wave generators, foam emitters, depth
//! renderers. Inputs announce themselves to an explicit [`InputRegistry`]
//! owned by the renderer; the simulations query it each frame for what to
//! draw. The registry is generic over the host's command buffer type, so it
//! carries no graphics dependency of its own.

use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// The kinds of simulation data an input can feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LodKind {
    /// Surface displacement from wave generators.
    AnimatedWaves,
    /// Ripple simulation responding to interaction.
    DynamicWaves,
    /// Horizontal water motion.
    Flow,
    /// Foam accumulation.
    Foam,
    /// Water depth for attenuating waves near shorelines.
    SeaFloorDepth,
    /// Shadowing of the water surface.
    Shadow,
}

impl LodKind {
    /// Every kind, for hosts that process all simulations uniformly.
    pub const ALL: [LodKind; 6] = [
        LodKind::AnimatedWaves,
        LodKind::DynamicWaves,
        LodKind::Flow,
        LodKind::Foam,
        LodKind::SeaFloorDepth,
        LodKind::Shadow,
    ];

    /// Returns the display name of this kind.
    pub fn name(&self) -> &'static str {
        match self {
            LodKind::AnimatedWaves => "animated waves",
            LodKind::DynamicWaves => "dynamic waves",
            LodKind::Flow => "flow",
            LodKind::Foam => "foam",
            LodKind::SeaFloorDepth => "sea floor depth",
            LodKind::Shadow => "shadow",
        }
    }
}

impl fmt::Display for LodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Capability contract for anything that feeds simulation data.
///
/// `B` is the host's command buffer type; the registry only passes it
/// through. Implementations stay registered while inactive and gate
/// themselves through [`enabled`](Self::enabled) instead.
pub trait LodInput<B> {
    /// Records this input's draw into the host command buffer.
    ///
    /// `weight` scales the contribution and is always positive here; the
    /// registry skips the call otherwise. `transition` marks a draw into
    /// the crossfade band between LOD levels.
    fn draw(&self, buf: &mut B, weight: f32, transition: bool, lod_index: usize);

    /// Spatial scale of the content, used to pick which LOD levels this
    /// input lands in.
    fn wavelength(&self) -> f32;

    /// Returns true if this input currently contributes.
    fn enabled(&self) -> bool;
}

/// Identifies one registration, for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputHandle {
    kind: LodKind,
    id: u64,
}

impl InputHandle {
    /// Returns the kind this handle was registered under.
    pub fn kind(&self) -> LodKind {
        self.kind
    }
}

/// Errors from registry operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// The handle does not refer to a live registration.
    #[error("no {kind} input registered for handle {id}", kind = .0.name(), id = .1)]
    UnknownHandle(LodKind, u64),
}

struct Entry<B> {
    id: u64,
    input: Box<dyn LodInput<B>>,
}

struct Slot<B> {
    entries: Vec<Entry<B>>,
    changed: bool,
}

impl<B> Default for Slot<B> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            changed: false,
        }
    }
}

/// Registry of simulation inputs, keyed by the kind of data they feed.
///
/// Owned by the renderer and handed to whoever needs it; there is no global
/// instance. Registration order is preserved per kind, and each kind tracks
/// a changed flag so simulations that cache their input lists know when to
/// rebuild them.
pub struct InputRegistry<B> {
    slots: HashMap<LodKind, Slot<B>>,
    next_id: u64,
}

impl<B> Default for InputRegistry<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> InputRegistry<B> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
            next_id: 0,
        }
    }

    /// Registers an input under `kind` and returns its handle.
    pub fn register<I: LodInput<B> + 'static>(&mut self, kind: LodKind, input: I) -> InputHandle {
        let id = self.next_id;
        self.next_id += 1;

        let slot = self.slots.entry(kind).or_default();
        slot.entries.push(Entry {
            id,
            input: Box::new(input),
        });
        slot.changed = true;

        tracing::debug!("Registered {} input {}", kind, id);
        InputHandle { kind, id }
    }

    /// Removes the registration behind `handle`.
    pub fn unregister(&mut self, handle: InputHandle) -> Result<(), RegistryError> {
        let unknown = RegistryError::UnknownHandle(handle.kind, handle.id);
        let slot = self.slots.get_mut(&handle.kind).ok_or(unknown)?;
        let index = slot
            .entries
            .iter()
            .position(|entry| entry.id == handle.id)
            .ok_or(unknown)?;

        slot.entries.remove(index);
        slot.changed = true;

        tracing::debug!("Unregistered {} input {}", handle.kind, handle.id);
        Ok(())
    }

    /// Number of inputs registered under `kind`.
    pub fn len(&self, kind: LodKind) -> usize {
        self.slots.get(&kind).map_or(0, |slot| slot.entries.len())
    }

    /// Returns true if nothing is registered under `kind`.
    pub fn is_empty(&self, kind: LodKind) -> bool {
        self.len(kind) == 0
    }

    /// Iterates the inputs registered under `kind`, in registration order.
    pub fn inputs(&self, kind: LodKind) -> impl Iterator<Item = &dyn LodInput<B>> {
        self.slots
            .get(&kind)
            .into_iter()
            .flat_map(|slot| slot.entries.iter())
            .map(|entry| entry.input.as_ref())
    }

    /// Draws every enabled input of `kind` into `buf`.
    ///
    /// # Returns
    /// The number of inputs drawn
    pub fn submit_draws(
        &self,
        kind: LodKind,
        buf: &mut B,
        weight: f32,
        transition: bool,
        lod_index: usize,
    ) -> usize {
        self.submit_draws_filtered(kind, buf, weight, transition, lod_index, |_| true)
    }

    /// Draws the enabled inputs of `kind` accepted by `filter` into `buf`.
    ///
    /// Simulations that sort content into LOD levels pass a wavelength
    /// predicate here. A non-positive `weight` contributes nothing and
    /// skips all draws.
    ///
    /// # Returns
    /// The number of inputs drawn
    pub fn submit_draws_filtered(
        &self,
        kind: LodKind,
        buf: &mut B,
        weight: f32,
        transition: bool,
        lod_index: usize,
        filter: impl Fn(&dyn LodInput<B>) -> bool,
    ) -> usize {
        if weight <= 0.0 {
            return 0;
        }

        let mut drawn = 0;
        for input in self.inputs(kind) {
            if !input.enabled() || !filter(input) {
                continue;
            }
            input.draw(buf, weight, transition, lod_index);
            drawn += 1;
        }
        drawn
    }

    /// Returns true if the membership of `kind` changed since the flag was
    /// last taken.
    pub fn is_changed(&self, kind: LodKind) -> bool {
        self.slots.get(&kind).is_some_and(|slot| slot.changed)
    }

    /// Clears and returns the changed flag for `kind`.
    ///
    /// Simulations call this once per frame and rebuild cached state when
    /// it comes back true.
    pub fn take_changed(&mut self, kind: LodKind) -> bool {
        match self.slots.get_mut(&kind) {
            Some(slot) => std::mem::take(&mut slot.changed),
            None => false,
        }
    }
}
