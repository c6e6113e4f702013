//! Test helpers: a minimal adapter system whose capability is a label.

use crate::definition::{AdapterDefinition, AdapterSystem};
use govkit_types::ModuleDescriptor;
use std::sync::Arc;

pub trait Describe: Send + Sync {
    fn describe(&self) -> String;
}

pub struct Fixed(pub &'static str);

impl Describe for Fixed {
    fn describe(&self) -> String {
        self.0.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestOptions {
    pub label: String,
    pub address: String,
}

pub struct TestSystem;

impl AdapterSystem for TestSystem {
    const NAME: &'static str = "test";
    type Capabilities = dyn Describe;
    type InitialOptions = String;
    type Options = TestOptions;

    fn build_options(label: String, module: &ModuleDescriptor) -> TestOptions {
        TestOptions {
            label,
            address: module.address.clone(),
        }
    }
}

/// A definition with id `id` whose capability describes itself as `id`
pub fn definition(id: &'static str, contract: &str) -> AdapterDefinition<TestSystem> {
    AdapterDefinition::new(id, Arc::new(Fixed(id)) as Arc<dyn Describe>).with_matcher(contract)
}

pub fn module(address: &str, contract: &str) -> ModuleDescriptor {
    ModuleDescriptor::new(address, contract)
}
