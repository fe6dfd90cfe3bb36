use crate::value::Value;

/// An ordered set of sections, unique by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    sections: Vec<Section>,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.name == name)
    }

    #[must_use]
    pub fn get(&self, section: &str, key: &str) -> Option<&Value> {
        self.section(section).and_then(|section| section.get(key))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub(crate) fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|section| section.name == name)
    }

    /// Returns the section named `name`, appending an empty one if it does not exist yet.
    pub(crate) fn section_mut_or_insert(&mut self, name: &str) -> &mut Section {
        let index = match self.position(name) {
            Some(i) => i,
            None => {
                self.sections.push(Section::new(name.to_owned()));
                self.sections.len() - 1
            }
        };

        &mut self.sections[index]
    }

    /// Replaces the section with the same name in place, or appends it.
    pub(crate) fn replace_section(&mut self, section: Section) {
        match self.position(&section.name) {
            Some(i) => self.sections[i] = section,
            None => self.sections.push(section),
        }
    }

    pub(crate) fn remove_section(&mut self, name: &str) -> Option<Section> {
        self.position(name).map(|i| self.sections.remove(i))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.sections.iter().position(|section| section.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    name: String,
    entries: Vec<Entry>,
}

impl Section {
    #[must_use]
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| &entry.value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overwrites an existing key where it stands; new keys go to the end.
    pub(crate) fn set(&mut self, key: String, value: Value) {
        match self.entries.iter_mut().find(|entry| entry.key == key) {
            Some(entry) => entry.value = value,
            None => self.entries.push(Entry { key, value }),
        }
    }

    pub(crate) fn remove(&mut self, key: &str) -> Option<Value> {
        let i = self.entries.iter().position(|entry| entry.key == key)?;
        Some(self.entries.remove(i).value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    key: String,
    value: Value,
}

impl Entry {
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }
}
