//! The set of models rendered together, with one of them active.

use crate::model::MeshModel;

#[derive(Clone, Debug, Default)]
pub struct Scene {
    models: Vec<MeshModel>,
    active: Option<usize>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `model`, makes it the active one, and returns its index.
    pub fn add_model(&mut self, model: MeshModel) -> usize {
        self.models.push(model);
        let index = self.models.len() - 1;
        self.active = Some(index);
        index
    }

    pub fn models(&self) -> &[MeshModel] {
        &self.models
    }

    pub fn models_mut(&mut self) -> &mut [MeshModel] {
        &mut self.models
    }

    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_model(&self) -> Option<&MeshModel> {
        self.active.and_then(|i| self.models.get(i))
    }

    pub fn active_model_mut(&mut self) -> Option<&mut MeshModel> {
        self.active.and_then(|i| self.models.get_mut(i))
    }

    /// Selects the model at `index`. Returns false, leaving the selection
    /// as it was, if there is no such model.
    pub fn set_active(&mut self, index: usize) -> bool {
        if index < self.models.len() {
            self.active = Some(index);
            true
        } else {
            false
        }
    }
}
