//! Operation routing.
//!
//! The transport layer exposes `$expand` both at instance level
//! (`ValueSet/<id>/$expand`) and at type level (`ValueSet/$expand`). Both
//! shapes land in the routing table below and call the single
//! [`ValueSetExpander::expand`] procedure with a normalized
//! [`ExpansionRequest`]; only the dispatch mechanism differs from a
//! framework-bound handler pair.

use crate::error::{ExpansionError, ExpansionResult};
use crate::expander::ValueSetExpander;
use crate::request::ExpansionRequest;
use crate::result::ValueSetExpansion;

/// Name of the expansion operation.
pub const EXPAND: &str = "$expand";

/// Whether an operation addresses a stored instance or the resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationScope {
    /// Addressed to a stored resource by id.
    Instance,
    /// Addressed to the resource type as a whole.
    Type,
}

impl OperationScope {
    /// Derives the scope from the parameter shape of a request.
    pub fn of(request: &ExpansionRequest) -> Self {
        if request.value_set_id.is_some() {
            OperationScope::Instance
        } else {
            OperationScope::Type
        }
    }
}

type OperationHandler =
    fn(&ValueSetExpander<'_>, &ExpansionRequest) -> ExpansionResult<ValueSetExpansion>;

/// One routing table entry: an operation name plus the parameter shape it
/// accepts.
pub struct OperationRoute {
    /// Operation name, e.g. `$expand`.
    pub name: &'static str,
    /// Parameter shape the route accepts.
    pub scope: OperationScope,
    handler: OperationHandler,
}

/// The routing table, keyed by operation name and parameter shape.
const ROUTES: &[OperationRoute] = &[
    OperationRoute {
        name: EXPAND,
        scope: OperationScope::Instance,
        handler: expand_handler,
    },
    OperationRoute {
        name: EXPAND,
        scope: OperationScope::Type,
        handler: expand_handler,
    },
];

fn expand_handler(
    expander: &ValueSetExpander<'_>,
    request: &ExpansionRequest,
) -> ExpansionResult<ValueSetExpansion> {
    expander.expand(request)
}

/// Routes an operation by name and parameter shape.
///
/// # Errors
///
/// [`ExpansionError::BadParameter`] when no route matches, plus anything the
/// routed operation raises.
pub fn dispatch(
    expander: &ValueSetExpander<'_>,
    operation: &str,
    request: &ExpansionRequest,
) -> ExpansionResult<ValueSetExpansion> {
    let scope = OperationScope::of(request);
    let route = ROUTES
        .iter()
        .find(|route| route.name == operation && route.scope == scope)
        .ok_or_else(|| {
            ExpansionError::BadParameter(format!("unsupported operation '{operation}'"))
        })?;
    (route.handler)(expander, request)
}
