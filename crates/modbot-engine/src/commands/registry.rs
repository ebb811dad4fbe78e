//! Command registry - name/alias resolution and permission-gated listing
//!
//! Dispatch is O(1): a single lowercased token index covers names and
//! aliases. Matching is exact by design - no fuzzy or prefix matching.

use std::collections::HashMap;
use std::sync::Arc;

use modbot_core::{DomainError, Permissions};

use super::{CommandHandler, CommandSource};

/// An immutable command registration
///
/// Created once at feature activation time, lives for the process lifetime.
pub struct CommandDescriptor {
    pub name: String,
    pub aliases: Vec<String>,
    pub description: String,
    /// Empty set means the command is public
    pub required_permission: Permissions,
    handler: Arc<dyn CommandHandler>,
}

impl CommandDescriptor {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        handler: Arc<dyn CommandHandler>,
    ) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            description: description.into(),
            required_permission: Permissions::empty(),
            handler,
        }
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_permission(mut self, required: Permissions) -> Self {
        self.required_permission = required;
        self
    }

    pub fn handler(&self) -> &Arc<dyn CommandHandler> {
        &self.handler
    }
}

/// Registry mapping command names and aliases to descriptors
pub struct CommandRegistry {
    prefix: String,
    commands: Vec<CommandDescriptor>,
    /// Lowercased name or alias -> index into `commands`
    index: HashMap<String, usize>,
}

impl CommandRegistry {
    /// Create an empty registry with the given command prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            commands: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Register a command
    ///
    /// Fails when the name or any alias collides case-insensitively with any
    /// previously registered name or alias. Fatal at startup: feature
    /// activation aborts on this error.
    pub fn register(&mut self, descriptor: CommandDescriptor) -> Result<(), DomainError> {
        let mut keys = vec![descriptor.name.to_lowercase()];
        keys.extend(descriptor.aliases.iter().map(|a| a.to_lowercase()));

        for key in &keys {
            if self.index.contains_key(key) {
                return Err(DomainError::DuplicateCommand { name: key.clone() });
            }
        }
        // A descriptor colliding with itself (alias == name) is also a conflict
        for (i, key) in keys.iter().enumerate() {
            if keys[..i].contains(key) {
                return Err(DomainError::DuplicateCommand { name: key.clone() });
            }
        }

        let idx = self.commands.len();
        for key in keys {
            self.index.insert(key, idx);
        }
        self.commands.push(descriptor);
        Ok(())
    }

    /// Resolve a raw input line to a descriptor and its argument tokens
    ///
    /// Returns `None` when the line does not carry the prefix or no command
    /// matches; the caller owns the "not found" reply.
    pub fn resolve(&self, raw_line: &str) -> Option<(&CommandDescriptor, Vec<String>)> {
        let line = raw_line.trim().strip_prefix(self.prefix.as_str())?;
        let mut tokens = line.split_whitespace();
        let name = tokens.next()?.to_lowercase();

        let idx = *self.index.get(&name)?;
        let args = tokens.map(str::to_string).collect();
        Some((&self.commands[idx], args))
    }

    /// All commands the source may run, in registration order
    pub fn list_accessible_to(&self, source: &dyn CommandSource) -> Vec<&CommandDescriptor> {
        self.commands
            .iter()
            .filter(|d| source.has_permission(d.required_permission))
            .collect()
    }

    /// Number of registered commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{CommandContext, ConsoleSource};
    use async_trait::async_trait;

    struct NoopHandler;

    #[async_trait]
    impl CommandHandler for NoopHandler {
        async fn execute(
            &self,
            _ctx: CommandContext<'_>,
            _source: &dyn CommandSource,
            _args: &[String],
        ) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn descriptor(name: &str, aliases: &[&str]) -> CommandDescriptor {
        CommandDescriptor::new(name, "test command", Arc::new(NoopHandler))
            .with_aliases(aliases.iter().copied())
    }

    fn registry_with(entries: &[(&str, &[&str])]) -> CommandRegistry {
        let mut registry = CommandRegistry::new("!");
        for (name, aliases) in entries {
            registry.register(descriptor(name, aliases)).unwrap();
        }
        registry
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let registry = registry_with(&[("help", &[])]);
        let (descriptor, args) = registry.resolve("!Help").unwrap();
        assert_eq!(descriptor.name, "help");
        assert!(args.is_empty());
    }

    #[test]
    fn test_resolve_splits_args() {
        let registry = registry_with(&[("warn", &[])]);
        let (_, args) = registry.resolve("!warn 1234  spamming links").unwrap();
        assert_eq!(args, vec!["1234", "spamming", "links"]);
    }

    #[test]
    fn test_resolve_via_alias() {
        let registry = registry_with(&[("punishments", &["pl"])]);
        let (descriptor, _) = registry.resolve("!PL").unwrap();
        assert_eq!(descriptor.name, "punishments");
    }

    #[test]
    fn test_resolve_requires_prefix_and_exact_match() {
        let registry = registry_with(&[("help", &[])]);
        assert!(registry.resolve("help").is_none());
        assert!(registry.resolve("!hel").is_none());
        assert!(registry.resolve("!helpme").is_none());
        assert!(registry.resolve("").is_none());
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let mut registry = registry_with(&[("help", &[])]);
        let err = registry.register(descriptor("HELP", &[])).unwrap_err();
        assert!(matches!(err, DomainError::DuplicateCommand { name } if name == "help"));
    }

    #[test]
    fn test_name_colliding_with_existing_alias_is_rejected() {
        let mut registry = registry_with(&[("punishments", &["pl"])]);
        let err = registry.register(descriptor("PL", &[])).unwrap_err();
        assert!(matches!(err, DomainError::DuplicateCommand { name } if name == "pl"));
    }

    #[test]
    fn test_alias_colliding_with_existing_name_is_rejected() {
        let mut registry = registry_with(&[("help", &[])]);
        let err = registry.register(descriptor("guide", &["Help"])).unwrap_err();
        assert!(matches!(err, DomainError::DuplicateCommand { name } if name == "help"));
    }

    #[test]
    fn test_failed_registration_leaves_registry_unchanged() {
        let mut registry = registry_with(&[("help", &[])]);
        registry
            .register(descriptor("warn", &["help"]))
            .unwrap_err();
        assert_eq!(registry.len(), 1);
        assert!(registry.resolve("!warn").is_none());
    }

    struct ReadOnlySource;

    #[async_trait]
    impl CommandSource for ReadOnlySource {
        fn id(&self) -> modbot_core::Snowflake {
            modbot_core::Snowflake::new(42)
        }

        fn name(&self) -> &str {
            "reader"
        }

        fn channel_id(&self) -> modbot_core::Snowflake {
            modbot_core::Snowflake::new(0)
        }

        fn has_permission(&self, required: Permissions) -> bool {
            Permissions::VIEW_RECORDS.has(required)
        }

        async fn reply(&self, _text: &str) -> Result<(), modbot_core::GatewayError> {
            Ok(())
        }
    }

    #[test]
    fn test_list_accessible_filters_by_permission() {
        let mut registry = CommandRegistry::new("!");
        registry.register(descriptor("help", &[])).unwrap();
        registry
            .register(descriptor("warn", &[]).with_permission(Permissions::MODERATE))
            .unwrap();
        registry
            .register(descriptor("warns", &[]).with_permission(Permissions::VIEW_RECORDS))
            .unwrap();

        let listed = registry.list_accessible_to(&ReadOnlySource);
        let names: Vec<_> = listed.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["help", "warns"]);
    }

    #[test]
    fn test_list_accessible_preserves_registration_order() {
        let registry = registry_with(&[("zeta", &[]), ("alpha", &[]), ("mid", &[])]);
        let listed = registry.list_accessible_to(&ConsoleSource);
        let names: Vec<_> = listed.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }
}
