//! # govkit-adapters
//!
//! Runtime dispatch from on-chain contract ids to adapter implementations.
//!
//! A DAO's modules are discovered at runtime, and the UI does not know which
//! contract (or contract version) backs a module until it reads chain state.
//! This crate selects an implementation for each module instance:
//!
//! - [`AdapterSystem`] fixes the capability interface and options shape for
//!   one kind of module (proposal modules, voting modules)
//! - [`AdapterDefinition`] is one implementation, selected by
//!   [`ContractMatcher`]s over contract ids
//! - [`AdapterRegistry`] / [`GlobalRegistry`] hold definitions in
//!   registration order, which is also resolution priority
//! - [`resolve`] picks the `(module, definition)` pair for a module list
//! - [`ScopedProvider`] owns one binding, runs the adapter's async bootstrap
//!   and exposes the result through [`AdapterScope`]
//!
//! ## Usage
//!
//! ```ignore
//! use govkit_adapters::{ScopedProvider, ModuleSelector};
//!
//! PROPOSAL_ADAPTERS.register([cw_proposal_single::adapter()])?;
//!
//! let provider = ScopedProvider::mount(
//!     &PROPOSAL_ADAPTERS.read(),
//!     &dao.proposal_modules,
//!     ModuleSelector::prefix("A"),
//!     initial_options,
//! );
//! provider.ready().await;
//!
//! let line = provider.render(
//!     || "loading...".to_string(),
//!     |scope| {
//!         let caps = scope.capabilities()?;
//!         let options = scope.options()?;
//!         caps.proposal_line(&options, &proposal)
//!     },
//! )?;
//! ```

pub mod definition;
pub mod error;
pub mod matcher;
pub mod provider;
pub mod registry;
pub mod resolver;
pub mod scope;

#[cfg(test)]
pub(crate) mod testutil;

pub use definition::{AdapterDefinition, AdapterSystem, BootstrapFn};
pub use error::{AdapterError, AdapterResult};
pub use matcher::ContractMatcher;
pub use provider::{ProviderPhase, ProviderState, ScopedProvider};
pub use registry::{AdapterRegistry, GlobalRegistry};
pub use resolver::{resolve, AdapterMatch, ResolvedBinding, Resolution};
pub use scope::AdapterScope;

pub use govkit_types::{ContractId, ModuleDescriptor, ModuleSelector};
