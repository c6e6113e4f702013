//! End-to-end dispatch tests through the public API

use govkit_adapters::{
    AdapterDefinition, AdapterError, AdapterRegistry, AdapterScope, AdapterSystem, ContractMatcher,
    GlobalRegistry, ModuleDescriptor, ModuleSelector, ProviderPhase, ScopedProvider,
};
use std::sync::Arc;

trait Greeter: Send + Sync {
    fn greet(&self, options: &GreetOptions) -> String;
}

struct Named(&'static str);

impl Greeter for Named {
    fn greet(&self, options: &GreetOptions) -> String {
        format!("{} greets {} at {}", self.0, options.who, options.address)
    }
}

#[derive(Debug)]
struct GreetOptions {
    who: String,
    address: String,
}

struct GreetSystem;

impl AdapterSystem for GreetSystem {
    const NAME: &'static str = "greet";
    type Capabilities = dyn Greeter;
    type InitialOptions = String;
    type Options = GreetOptions;

    fn build_options(who: String, module: &ModuleDescriptor) -> GreetOptions {
        GreetOptions {
            who,
            address: module.address.clone(),
        }
    }
}

fn adapter(id: &'static str, contract: &str) -> AdapterDefinition<GreetSystem> {
    AdapterDefinition::new(id, Arc::new(Named(id)) as Arc<dyn Greeter>).with_matcher(contract)
}

fn render_greeting(scope: &AdapterScope<GreetSystem>) -> Result<String, AdapterError> {
    let caps = scope.capabilities()?;
    let options = scope.options()?;
    Ok(caps.greet(&options))
}

#[tokio::test]
async fn test_versioned_contracts_pick_their_adapter() {
    let mut registry = AdapterRegistry::new();
    registry
        .register([adapter("A", "pkg:x-v1"), adapter("B", "pkg:x-v2")])
        .unwrap();

    let modules = vec![ModuleDescriptor::new("m1", "pkg:x-v2")];
    let provider = ScopedProvider::mount(&registry, &modules, ModuleSelector::FirstMatch, "dao".to_string());

    let rendered = provider
        .render(|| Ok("loading".to_string()), render_greeting)
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(rendered, "B greets dao at m1");
}

#[tokio::test]
async fn test_overlapping_matchers_prefer_earlier_registration() {
    let mut registry = AdapterRegistry::new();
    registry.register([adapter("A", "pkg:y")]).unwrap();
    registry
        .register([adapter("B", "pkg:y").with_matcher(ContractMatcher::prefix("pkg:"))])
        .unwrap();

    let modules = vec![ModuleDescriptor::new("m1", "pkg:y")];
    let provider = ScopedProvider::mount(&registry, &modules, ModuleSelector::FirstMatch, String::new());

    let binding = provider.scope().binding().unwrap();
    assert_eq!(binding.adapter_id(), "A");
}

#[tokio::test]
async fn test_empty_registry_reports_no_matching_adapter() {
    let registry = AdapterRegistry::<GreetSystem>::new();
    let modules = vec![ModuleDescriptor::new("m1", "pkg:x-v1")];
    let provider = ScopedProvider::mount(&registry, &modules, ModuleSelector::FirstMatch, String::new());

    assert_eq!(provider.phase(), ProviderPhase::Failed);
    assert!(matches!(
        provider.error(),
        Some(AdapterError::NoMatchingAdapter { system: "greet", .. })
    ));
}

#[tokio::test]
async fn test_no_modules_and_no_match_are_distinct() {
    let mut registry = AdapterRegistry::new();
    registry.register([adapter("A", "pkg:a")]).unwrap();

    let none = ScopedProvider::mount(&registry, &[], ModuleSelector::FirstMatch, String::new());
    let unsupported = ScopedProvider::mount(
        &registry,
        &[ModuleDescriptor::new("m1", "pkg:b")],
        ModuleSelector::FirstMatch,
        String::new(),
    );

    assert_eq!(none.phase(), ProviderPhase::NoModules);
    assert_eq!(none.render(|| (), |_| ()).unwrap(), None);

    assert_eq!(unsupported.phase(), ProviderPhase::Failed);
    assert!(unsupported.render(|| (), |_| ()).is_err());
}

#[test]
fn test_accessors_outside_provider() {
    let scope = AdapterScope::<GreetSystem>::detached();
    assert_eq!(
        render_greeting(&scope),
        Err(AdapterError::MissingProviderContext { system: "greet" })
    );
}

static GREETERS: GlobalRegistry<GreetSystem> = GlobalRegistry::new();

#[tokio::test]
async fn test_global_registry_bootstrap_flow() {
    GREETERS
        .register([
            adapter("v1", "pkg:greeter-v1"),
            adapter("v2", "pkg:greeter-v2").with_bootstrap(|options| async move {
                anyhow::ensure!(!options.address.is_empty(), "module has no address");
                Ok::<(), anyhow::Error>(())
            }),
        ])
        .unwrap();

    let err = GREETERS.register([adapter("v1", "pkg:other")]).unwrap_err();
    assert!(matches!(err, AdapterError::DuplicateAdapterId { .. }));

    let modules = vec![
        ModuleDescriptor::new("m1", "pkg:greeter-v1").with_prefix("A"),
        ModuleDescriptor::new("m2", "pkg:greeter-v2").with_prefix("B"),
    ];

    let first = ScopedProvider::mount(&GREETERS.read(), &modules, ModuleSelector::prefix("A"), "a".to_string());
    let second = ScopedProvider::mount(&GREETERS.read(), &modules, ModuleSelector::prefix("B"), "b".to_string());

    assert_eq!(first.phase(), ProviderPhase::Resolved);
    assert_eq!(second.ready().await, ProviderPhase::Resolved);

    let a = render_greeting(&first.scope()).unwrap();
    let b = render_greeting(&second.scope()).unwrap();
    assert_eq!(a, "v1 greets a at m1");
    assert_eq!(b, "v2 greets b at m2");
}
