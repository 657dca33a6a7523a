use crate::collection::EntityCollection;
use crate::entities::{Channel, Input, Note, SourceKind};
use crate::ids::{ChannelId, InputId, NoteKey};
use midibox_theory::MAX_NOTE;

/// Entities to add to a [`MidiStore`] in one step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registration {
    pub inputs: Vec<Input>,
    pub channels: Vec<Channel>,
    pub notes: Vec<Note>,
}

impl Registration {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single source with the given channels, each holding all 128 notes.
    pub fn source(
        id: impl Into<InputId>,
        name: impl Into<String>,
        kind: SourceKind,
        channels: impl IntoIterator<Item = u8>,
    ) -> Self {
        let mut registration = Self::new();
        registration.add_input(Input::new(id, name, kind), channels);
        registration
    }

    /// Adds `input` and its channels.
    pub fn add_input(&mut self, input: Input, channels: impl IntoIterator<Item = u8>) -> &mut Self {
        for number in channels {
            let channel_id = input.id().channel(number);
            self.notes
                .extend((0..=MAX_NOTE).map(|note| Note::new(channel_id.note(note))));
            self.channels.push(Channel::new(channel_id));
        }
        self.inputs.push(input);
        self
    }

    /// Applies `f` to every input of the registration.
    pub fn map_inputs(mut self, f: impl FnMut(&mut Input)) -> Self {
        self.inputs.iter_mut().for_each(f);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty() && self.channels.is_empty() && self.notes.is_empty()
    }
}

/// Normalized state of every registered input, channel and note.
#[derive(Debug, Clone, Default)]
pub struct MidiStore {
    pub(crate) inputs: EntityCollection<Input>,
    pub(crate) channels: EntityCollection<Channel>,
    pub(crate) notes: EntityCollection<Note>,
}

impl MidiStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inputs(&self) -> &EntityCollection<Input> {
        &self.inputs
    }

    pub fn channels(&self) -> &EntityCollection<Channel> {
        &self.channels
    }

    pub fn notes(&self) -> &EntityCollection<Note> {
        &self.notes
    }

    pub fn input(&self, id: &InputId) -> Option<&Input> {
        self.inputs.get(id)
    }

    pub fn channel(&self, id: &ChannelId) -> Option<&Channel> {
        self.channels.get(id)
    }

    pub fn note(&self, key: &NoteKey) -> Option<&Note> {
        self.notes.get(key)
    }

    /// Channels belonging to `input`, in registration order.
    pub fn channels_of<'a>(&'a self, input: &'a InputId) -> impl 'a + Iterator<Item = &'a Channel> {
        self.channels.iter().filter(move |c| c.input_id() == input)
    }

    /// Upserts all entities of `registration`. Existing entities with the same ids are replaced.
    pub fn register(&mut self, registration: Registration) {
        let Registration {
            inputs,
            channels,
            notes,
        } = registration;
        log::debug!(
            "Registering {} inputs, {} channels, {} notes",
            inputs.len(),
            channels.len(),
            notes.len()
        );
        self.notes.upsert_many(notes);
        self.channels.upsert_many(channels);
        self.inputs.upsert_many(inputs);
    }

    /// Removes the given inputs together with their channels and notes. Returns the number of inputs removed.
    pub fn unregister<'a>(&mut self, ids: impl IntoIterator<Item = &'a InputId>) -> usize {
        let ids: Vec<&InputId> = ids.into_iter().collect();
        let removed = self.inputs.retain(|input| !ids.contains(&input.id()));
        let channels = self
            .channels
            .retain(|channel| !ids.contains(&channel.input_id()));
        let notes = self.notes.retain(|note| !ids.contains(&note.key().input()));
        log::debug!("Unregistered {removed} inputs, {channels} channels, {notes} notes");
        removed
    }

    /// Edits the user-facing fields of an input. Returns false if it does not exist.
    pub fn update_input(&mut self, id: &InputId, f: impl FnOnce(&mut Input)) -> bool {
        self.inputs.update(id, f)
    }

    /// Edits the user-facing fields of a channel. Returns false if it does not exist.
    pub fn update_channel(&mut self, id: &ChannelId, f: impl FnOnce(&mut Channel)) -> bool {
        self.channels.update(id, f)
    }
}
