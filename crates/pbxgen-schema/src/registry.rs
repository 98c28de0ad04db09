use crate::token::TokenSource;
use crate::types::{ObjectId, Role};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("no token allocated for role '{0}'")]
    UnknownRole(String),
}

/// Mapping from symbolic role to the token generated for it in one run.
///
/// The registry is the only place tokens come from while a graph is built, so
/// every occurrence of an entity resolves to the same identifier.
#[derive(Debug, Clone, Default)]
pub struct TokenRegistry {
    tokens: BTreeMap<Role, ObjectId>,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the token for `role`, drawing a fresh one from `source` on first use.
    pub fn claim(&mut self, role: Role, source: &mut dyn TokenSource) -> ObjectId {
        self.tokens
            .entry(role)
            .or_insert_with(|| source.next_token())
            .clone()
    }

    pub fn get(&self, role: &str) -> Option<&ObjectId> {
        self.tokens.get(role)
    }

    /// Like [`get`](Self::get), but a missing role is an error.
    pub fn require(&self, role: &str) -> Result<ObjectId, RegistryError> {
        self.get(role)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownRole(role.to_owned()))
    }

    /// Reverse lookup, token to role. Linear; used for diagnostics and fingerprints.
    pub fn role_of(&self, token: &ObjectId) -> Option<&Role> {
        self.tokens
            .iter()
            .find_map(|(role, t)| (t == token).then_some(role))
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Role, &ObjectId)> {
        self.tokens.iter()
    }
}

/// Allocate one token per distinct role. Repeated roles share a token.
pub fn allocate_tokens<I>(roles: I, source: &mut dyn TokenSource) -> TokenRegistry
where
    I: IntoIterator<Item = Role>,
{
    let mut registry = TokenRegistry::new();
    for role in roles {
        registry.claim(role, source);
    }
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::seeded_token_source;

    fn roles(names: &[&str]) -> Vec<Role> {
        names.iter().map(|n| Role::from(*n)).collect()
    }

    #[test]
    fn allocates_one_token_per_role() {
        let mut source = seeded_token_source(42);
        let registry = allocate_tokens(roles(&["project", "group:main", "target:App"]), &mut source);
        assert_eq!(registry.len(), 3);
        assert!(registry.get("project").is_some());
        assert!(registry.get("group:main").is_some());
    }

    #[test]
    fn repeated_role_reuses_token() {
        let mut source = seeded_token_source(42);
        let registry = allocate_tokens(roles(&["project", "project", "target:App"]), &mut source);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn claim_is_stable() {
        let mut source = seeded_token_source(1);
        let mut registry = TokenRegistry::new();
        let first = registry.claim(Role::from("project"), &mut source);
        let second = registry.claim(Role::from("project"), &mut source);
        assert_eq!(first, second);
    }

    #[test]
    fn require_unknown_role_fails() {
        let registry = TokenRegistry::new();
        let err = registry.require("target:Missing").unwrap_err();
        assert!(err.to_string().contains("target:Missing"));
    }

    #[test]
    fn role_of_reverses_lookup() {
        let mut source = seeded_token_source(3);
        let registry = allocate_tokens(roles(&["project", "group:main"]), &mut source);
        let token = registry.require("group:main").unwrap();
        assert_eq!(registry.role_of(&token).unwrap().as_str(), "group:main");
    }

    #[test]
    fn tokens_are_pairwise_distinct() {
        let mut source = seeded_token_source(99);
        let names: Vec<String> = (0..200).map(|i| format!("file:{i}.swift")).collect();
        let registry = allocate_tokens(names.into_iter().map(Role::new), &mut source);
        let mut tokens: Vec<&ObjectId> = registry.iter().map(|(_, t)| t).collect();
        tokens.sort();
        tokens.dedup();
        assert_eq!(tokens.len(), 200);
    }
}
