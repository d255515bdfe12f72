//! Extension points for custom column types and grammar post-processing.
//!
//! Two hooks are offered:
//!
//! - [`TypeResolver`]: asked, in registration order, for the operators of a
//!   declared type the mapper has no built-in rule for. The first resolver
//!   returning `Some` wins.
//! - [`GrammarFilter`]: applied, in registration order, to the assembled
//!   descriptor. Each filter receives the previous filter's output.
//!
//! Both run synchronously. An error from either aborts grammar generation.

use tracing::{debug, trace};

use crate::error::{BoxError, GrammarError, Result};
use crate::field_type::DeclaredType;
use crate::grammar::GrammarDescriptor;
use crate::metadata::ColumnInfo;
use crate::token::OperatorSet;

/// Channel carrying the assembled grammar through the filters.
pub const GRAMMAR_FILTER_CHANNEL: &str = "Grammar_FilterGrammar";

const TYPE_CHANNEL_PREFIX: &str = "Grammar_Attributes_Type_";

/// Channel name a resolver for `type_name` listens on, e.g.
/// `Grammar_Attributes_Type_Currency` for `currency` or `CURRENCY`.
pub fn type_channel(type_name: &str) -> String {
    let lower = type_name.to_lowercase();
    let mut chars = lower.chars();
    let ucfirst: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    format!("{TYPE_CHANNEL_PREFIX}{ucfirst}")
}

/// Payload handed to a [`TypeResolver`].
#[derive(Debug, Clone)]
pub struct TypeRequest<'a> {
    /// The attribute being resolved, e.g. `ARTICLE.PRICE`.
    pub subject: &'a str,
    pub declared_type: &'a DeclaredType,
    /// The raw metadata of the column.
    pub mapping: &'a ColumnInfo,
    pub channel: String,
}

impl<'a> TypeRequest<'a> {
    pub fn new(subject: &'a str, mapping: &'a ColumnInfo) -> Self {
        Self {
            subject,
            declared_type: &mapping.declared_type,
            mapping,
            channel: type_channel(mapping.declared_type.name()),
        }
    }

    pub fn type_name(&self) -> &str {
        self.declared_type.name()
    }
}

/// Supplies operators for declared types without a built-in rule.
pub trait TypeResolver: Send + Sync {
    /// Returns `Ok(None)` when this resolver does not handle the type.
    fn resolve(&self, request: &TypeRequest<'_>) -> std::result::Result<Option<OperatorSet>, BoxError>;
}

/// Post-processes the assembled grammar.
pub trait GrammarFilter: Send + Sync {
    fn apply(&self, grammar: GrammarDescriptor) -> std::result::Result<GrammarDescriptor, BoxError>;
}

/// Resolver that answers every request with a fixed operator set.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticTypeResolver {
    operators: OperatorSet,
}

impl StaticTypeResolver {
    pub fn new<I, S>(operators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            operators: operators.into_iter().map(Into::into).collect(),
        }
    }
}

impl TypeResolver for StaticTypeResolver {
    fn resolve(&self, _request: &TypeRequest<'_>) -> std::result::Result<Option<OperatorSet>, BoxError> {
        Ok(Some(self.operators.clone()))
    }
}

struct FnResolver<F>(F);

impl<F> TypeResolver for FnResolver<F>
where
    F: Fn(&TypeRequest<'_>) -> std::result::Result<Option<OperatorSet>, BoxError> + Send + Sync,
{
    fn resolve(&self, request: &TypeRequest<'_>) -> std::result::Result<Option<OperatorSet>, BoxError> {
        (self.0)(request)
    }
}

struct FnFilter<F>(F);

impl<F> GrammarFilter for FnFilter<F>
where
    F: Fn(GrammarDescriptor) -> std::result::Result<GrammarDescriptor, BoxError> + Send + Sync,
{
    fn apply(&self, grammar: GrammarDescriptor) -> std::result::Result<GrammarDescriptor, BoxError> {
        (self.0)(grammar)
    }
}

struct RegisteredResolver {
    /// `None` listens on every type channel.
    channel: Option<String>,
    resolver: Box<dyn TypeResolver>,
}

/// Registered type resolvers and grammar filters.
#[derive(Default)]
pub struct ExtensionRegistry {
    resolvers: Vec<RegisteredResolver>,
    filters: Vec<Box<dyn GrammarFilter>>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a resolver consulted for every unknown type.
    pub fn add_resolver<R: TypeResolver + 'static>(&mut self, resolver: R) -> &mut Self {
        self.resolvers.push(RegisteredResolver {
            channel: None,
            resolver: Box::new(resolver),
        });
        self
    }

    /// Registers a resolver consulted only for `type_name`.
    pub fn add_type_resolver<R: TypeResolver + 'static>(
        &mut self,
        type_name: &str,
        resolver: R,
    ) -> &mut Self {
        self.resolvers.push(RegisteredResolver {
            channel: Some(type_channel(type_name)),
            resolver: Box::new(resolver),
        });
        self
    }

    /// Registers a closure resolving `type_name`.
    pub fn on_type<F>(&mut self, type_name: &str, resolver: F) -> &mut Self
    where
        F: Fn(&TypeRequest<'_>) -> std::result::Result<Option<OperatorSet>, BoxError>
            + Send
            + Sync
            + 'static,
    {
        self.add_type_resolver(type_name, FnResolver(resolver))
    }

    pub fn add_filter<G: GrammarFilter + 'static>(&mut self, filter: G) -> &mut Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Registers a closure filtering the assembled grammar.
    pub fn on_grammar<F>(&mut self, filter: F) -> &mut Self
    where
        F: Fn(GrammarDescriptor) -> std::result::Result<GrammarDescriptor, BoxError>
            + Send
            + Sync
            + 'static,
    {
        self.add_filter(FnFilter(filter))
    }

    pub fn resolver_count(&self) -> usize {
        self.resolvers.len()
    }

    pub fn filter_count(&self) -> usize {
        self.filters.len()
    }

    /// Asks the resolvers listening on the request's channel, first
    /// responder wins.
    pub fn resolve_type(&self, request: &TypeRequest<'_>) -> Result<Option<OperatorSet>> {
        let listening = self.resolvers.iter().filter(|r| match &r.channel {
            Some(channel) => *channel == request.channel,
            None => true,
        });

        for registered in listening {
            let answer = registered
                .resolver
                .resolve(request)
                .map_err(|source| GrammarError::Extension {
                    channel: request.channel.clone(),
                    source,
                })?;
            if let Some(operators) = answer {
                debug!(
                    attribute = request.subject,
                    channel = %request.channel,
                    "custom type resolved to {operators:?}"
                );
                return Ok(Some(operators));
            }
        }

        trace!(channel = %request.channel, "no resolver responded");
        Ok(None)
    }

    /// Folds the grammar through all filters in registration order.
    pub fn filter_grammar(&self, grammar: GrammarDescriptor) -> Result<GrammarDescriptor> {
        self.filters
            .iter()
            .enumerate()
            .try_fold(grammar, |grammar, (index, filter)| {
                trace!(index, "applying grammar filter");
                filter.apply(grammar).map_err(|source| GrammarError::Extension {
                    channel: GRAMMAR_FILTER_CHANNEL.to_string(),
                    source,
                })
            })
    }
}

impl std::fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionRegistry")
            .field("resolvers", &self.resolvers.len())
            .field("filters", &self.filters.len())
            .finish()
    }
}
