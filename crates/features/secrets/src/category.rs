use crate::error::SecretsError;
use crate::manager::StorageManager;
use std::fmt::Write as _;

/// Shape of a [`Category`] node.
#[derive(Debug, Clone)]
pub enum CategoryKind {
    Leaf,
    /// Children in insertion order.
    Group(Vec<Category>),
}

/// A named node of the category tree. Its secret lives in storage under its name.
#[derive(Debug, Clone)]
pub struct Category {
    name: String,
    kind: CategoryKind,
    storage: StorageManager,
}

impl Category {
    #[must_use]
    pub fn leaf(name: impl Into<String>, storage: StorageManager) -> Self {
        Self { name: name.into(), kind: CategoryKind::Leaf, storage }
    }

    #[must_use]
    pub fn group(name: impl Into<String>, storage: StorageManager) -> Self {
        Self { name: name.into(), kind: CategoryKind::Group(Vec::new()), storage }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn kind(&self) -> &CategoryKind {
        &self.kind
    }

    #[must_use]
    pub const fn is_group(&self) -> bool {
        matches!(self.kind, CategoryKind::Group(_))
    }

    #[must_use]
    pub fn children(&self) -> &[Self] {
        match &self.kind {
            CategoryKind::Leaf => &[],
            CategoryKind::Group(children) => children,
        }
    }

    /// # Errors
    /// See [`StorageManager::save`].
    pub fn set_password(&self, password: &str) -> Result<(), SecretsError> {
        self.storage.save(&self.name, password)
    }

    /// # Errors
    /// See [`StorageManager::load`].
    pub fn password(&self) -> Result<Option<String>, SecretsError> {
        self.storage.load(&self.name)
    }

    /// # Errors
    /// [`SecretsError::InvalidCategory`] if `self` is a leaf.
    pub fn add_child(&mut self, child: Self) -> Result<(), SecretsError> {
        match &mut self.kind {
            CategoryKind::Group(children) => {
                children.push(child);
                Ok(())
            }
            CategoryKind::Leaf => Err(SecretsError::InvalidCategory {
                message: format!("leaf '{}' cannot have children", self.name).into(),
                context: None,
            }),
        }
    }

    /// Removes the first direct child called `name`.
    pub fn remove_child(&mut self, name: &str) -> Option<Self> {
        let CategoryKind::Group(children) = &mut self.kind else {
            return None;
        };
        let index = children.iter().position(|c| c.name == name)?;
        Some(children.remove(index))
    }

    /// Depth-first search including `self`.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Self> {
        if self.name == name {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(name))
    }

    /// Every name in the subtree, pre-order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node.name());
            stack.extend(node.children().iter().rev());
        }
        out
    }

    /// Indented listing of the subtree with each node's current password.
    ///
    /// Reads go through storage, so each node adds a consultation to the log.
    ///
    /// # Errors
    /// The first load failure.
    pub fn render(&self) -> Result<String, SecretsError> {
        let mut out = String::new();
        let mut stack = vec![(self, 0usize)];

        while let Some((node, depth)) = stack.pop() {
            let label = if node.is_group() { "Group" } else { "Leaf" };
            let password = node.password()?.unwrap_or_else(|| "-".to_owned());
            let _ = writeln!(out, "{:indent$}{label} {} | password {password}", "", node.name, indent = depth * 2);

            stack.extend(node.children().iter().rev().map(|child| (child, depth + 1)));
        }
        Ok(out)
    }
}
