//! Vocabulary store: token string <-> id mapping plus special-role bindings.

use std::collections::HashMap;

use tracing::warn;

use super::TokenRole;
use crate::error::{TokenizerError, VocabError};

/// Bidirectional vocabulary.
///
/// Entries form a bijection: a token string maps to exactly one id and an id
/// to exactly one token string. Ids need not be contiguous.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    token_to_id: HashMap<String, u32>,
    id_to_token: HashMap<u32, String>,
    /// Special role -> literal token string.
    specials: HashMap<TokenRole, String>,
}

/// Resolved ids of the special roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialTokenIds {
    pub pad: u32,
    pub unk: u32,
    pub cls: u32,
    pub sep: u32,
    pub mask: Option<u32>,
}

impl SpecialTokenIds {
    /// Role of `id` if it is bound to a special role.
    ///
    /// When one id is bound to several roles, the first match in the order
    /// Classification, Separator, Padding, Unknown, Mask wins.
    pub fn role_of(&self, id: u32) -> Option<TokenRole> {
        if id == self.cls {
            Some(TokenRole::Classification)
        } else if id == self.sep {
            Some(TokenRole::Separator)
        } else if id == self.pad {
            Some(TokenRole::Padding)
        } else if id == self.unk {
            Some(TokenRole::Unknown)
        } else if self.mask == Some(id) {
            Some(TokenRole::Mask)
        } else {
            None
        }
    }
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a `(token, id)` entry.
    ///
    /// Rejects an empty token, a token that is already present, and an id
    /// already bound to another token. The store is unchanged on error.
    pub fn set(&mut self, token: impl Into<String>, id: u32) -> Result<(), VocabError> {
        let token = token.into();
        if token.is_empty() {
            return Err(VocabError::EmptyToken(id));
        }
        if let Some(&existing) = self.token_to_id.get(&token) {
            return Err(VocabError::DuplicateToken {
                token,
                id,
                existing,
            });
        }
        if let Some(existing) = self.id_to_token.get(&id) {
            return Err(VocabError::DuplicateId {
                token,
                id,
                existing: existing.clone(),
            });
        }

        self.token_to_id.insert(token.clone(), id);
        self.id_to_token.insert(id, token);
        Ok(())
    }

    /// Insert many entries, skipping and logging the ones `set` rejects.
    ///
    /// Returns the rejected entries' errors in input order.
    pub fn load_entries<I, S>(&mut self, entries: I) -> Vec<VocabError>
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let mut skipped = Vec::new();
        for (token, id) in entries {
            if let Err(e) = self.set(token, id) {
                warn!(error = %e, "Skipping vocabulary entry");
                skipped.push(e);
            }
        }
        skipped
    }

    /// Bind a special role to its literal token string.
    ///
    /// Each role can be bound once. The literal need not be in the vocabulary
    /// yet; [`Vocabulary::special_ids`] checks that later.
    pub fn assign_special(
        &mut self,
        role: TokenRole,
        literal: impl Into<String>,
    ) -> Result<(), VocabError> {
        let literal = literal.into();
        if !role.is_special() || self.specials.contains_key(&role) {
            return Err(VocabError::RoleAlreadyBound(role));
        }
        if literal.is_empty() {
            return Err(VocabError::EmptyLiteral(role));
        }
        self.specials.insert(role, literal);
        Ok(())
    }

    pub fn special_literal(&self, role: TokenRole) -> Option<&str> {
        self.specials.get(&role).map(String::as_str)
    }

    /// Id of the literal bound to `role`, if both the binding and the entry exist.
    pub fn special_id(&self, role: TokenRole) -> Option<u32> {
        self.special_literal(role)
            .and_then(|literal| self.token_to_id(literal))
    }

    /// Resolve every special role to an id.
    ///
    /// Fails on the first required role that is unbound or whose literal is
    /// not in the vocabulary. An unresolved Mask is only logged.
    pub fn special_ids(&self) -> Result<SpecialTokenIds, TokenizerError> {
        let required = |role: TokenRole| -> Result<u32, TokenizerError> {
            let literal = self
                .special_literal(role)
                .ok_or(TokenizerError::UnboundSpecialRole(role))?;
            self.token_to_id(literal)
                .ok_or_else(|| TokenizerError::MissingSpecialToken {
                    role,
                    literal: literal.to_string(),
                })
        };

        let mut resolved = [0u32; 4];
        for (slot, role) in resolved.iter_mut().zip(TokenRole::REQUIRED) {
            *slot = required(role)?;
        }
        let [pad, unk, cls, sep] = resolved;

        let ids = SpecialTokenIds {
            pad,
            unk,
            cls,
            sep,
            mask: self.special_id(TokenRole::Mask),
        };

        if ids.mask.is_none() {
            if let Some(literal) = self.special_literal(TokenRole::Mask) {
                warn!(literal, "Mask token not found in vocabulary");
            }
        }

        Ok(ids)
    }

    pub fn token_to_id(&self, token: &str) -> Option<u32> {
        self.token_to_id.get(token).copied()
    }

    pub fn id_to_token(&self, id: u32) -> Option<&str> {
        self.id_to_token.get(&id).map(String::as_str)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.token_to_id.contains_key(token)
    }

    /// Number of distinct entries.
    pub fn size(&self) -> usize {
        self.token_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.token_to_id.is_empty()
    }
}
