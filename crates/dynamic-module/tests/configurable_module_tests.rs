//! Integration tests for configurable modules
//!
//! Covers modules declared through `configurable_module!`, importing dynamic
//! modules into other modules, and token generation across threads.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use elif_dynamic_module::{
    configurable_module, AsyncModuleOptions, BuilderConfig, ClassProvider, ConfigurableModule,
    ConfigurableModuleBuilder, DynamicModule, Factory, InjectedArgs, MethodArgs,
    ModuleBuilderError, ModuleDefinition, ModuleImport, ModuleMetadata, OptionsFactory, Provider,
    ProviderDefinition, ProviderToken, TypeRef, UseClass,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("elif_dynamic_module=trace")
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Clone, PartialEq)]
pub struct StorageOptions {
    pub bucket: String,
    pub region: String,
}

#[derive(Default)]
struct StorageConfigService;

impl OptionsFactory<StorageOptions> for StorageConfigService {
    fn create_options(&self) -> StorageOptions {
        StorageOptions {
            bucket: "uploads".to_string(),
            region: "eu-west-1".to_string(),
        }
    }
}

struct StorageClient;
struct UploadController;
struct HttpModule;

configurable_module! {
    /// Storage module with the default method pair
    pub struct StorageModule;
    options: StorageOptions,
    builder: ConfigurableModuleBuilder::new(),
    metadata: ModuleMetadata::new()
        .with_provider(ClassProvider::of::<StorageClient>())
        .with_export(ProviderToken::of::<StorageClient>())
        .with_import(ModuleImport::of::<HttpModule>())
        .with_controller::<UploadController>()
        .with_global(true),
}

configurable_module! {
    pub struct QueueModule;
    options: u32,
    methods: for_root,
    builder: ConfigurableModuleBuilder::new(),
}

configurable_module! {
    pub struct ConfiguredModule;
    options: String,
    methods: configure,
    builder: ConfigurableModuleBuilder::from_config(
        BuilderConfig::from_yaml_str("token_suffix: _CONFIGURED\n").unwrap_or_default(),
    ),
}

struct AppModule;

impl ModuleDefinition for AppModule {
    fn metadata() -> ModuleMetadata {
        let storage = StorageModule::register(StorageOptions {
            bucket: "app".to_string(),
            region: "us-east-1".to_string(),
        });
        let queue = QueueModule::for_root_async(
            AsyncModuleOptions::new().use_factory(Factory::new(|_| 8u32)),
        );

        ModuleMetadata::new().with_import(storage).with_import(queue)
    }
}

fn storage_options() -> StorageOptions {
    StorageOptions {
        bucket: "media".to_string(),
        region: "ap-south-1".to_string(),
    }
}

#[test]
fn test_module_register_merges_declared_metadata() {
    init_tracing();

    let module = StorageModule::register(storage_options());

    assert!(module.module.is::<StorageModule>());
    assert_eq!(module.provider_count(), 2);

    let options = module
        .options_provider::<StorageOptions>(StorageModule::options_token())
        .and_then(|p| p.direct_value());
    assert_eq!(options, Some(&storage_options()));

    let client = ProviderToken::of::<StorageClient>();
    assert_eq!(module.providers[1].token(), &client);
    assert_eq!(module.exports, vec![client]);
    assert_eq!(module.imports.len(), 1);
    assert!(module.imports[0].module().is::<HttpModule>());
    assert_eq!(module.controllers, vec![TypeRef::of::<UploadController>()]);
    assert!(module.is_global);
}

#[test]
fn test_module_token_is_stable_per_module_type() {
    let token = StorageModule::options_token();
    let first = StorageModule::register(None);
    let second = StorageModule::register(storage_options());

    assert_eq!(token, StorageModule::options_token());
    assert!(first.providers[0].token().matches_options(token));
    assert!(second.providers[0].token().matches_options(token));
    assert_ne!(token, QueueModule::options_token());
}

#[test]
fn test_renamed_module_methods() {
    init_tracing();

    let class = QueueModule::configurable();
    assert_eq!(class.method_names(), ["for_root", "for_root_async"]);
    assert!(!class.has_method("register"));
    assert!(!class.has_method("register_async"));

    let token = QueueModule::options_token();
    let module = QueueModule::for_root(4u32);
    let value = module
        .options_provider::<u32>(token)
        .and_then(|p| p.direct_value());
    assert_eq!(value, Some(&4));

    let module = QueueModule::invoke("for_root", MethodArgs::options(5u32)).unwrap();
    let value = module
        .options_provider::<u32>(token)
        .and_then(|p| p.direct_value());
    assert_eq!(value, Some(&5));

    let result = QueueModule::invoke("register", MethodArgs::options(4u32));
    assert!(matches!(result, Err(ModuleBuilderError::UnknownMethod { .. })));

    let args = AsyncModuleOptions::<u32>::new();
    let result = QueueModule::invoke("register_async", args.into());
    assert!(matches!(result, Err(ModuleBuilderError::UnknownMethod { .. })));
}

mod renamed_module_surface {
    use super::*;

    /// Resolves only when the module type has no associated `register` items
    trait RegisterFallback {
        fn register(_options: u32) -> &'static str {
            "absent"
        }

        fn register_async(_options: u32) -> &'static str {
            "absent"
        }
    }

    impl RegisterFallback for QueueModule {}

    #[test]
    fn test_renamed_module_has_no_register_functions() {
        assert_eq!(QueueModule::register(4), "absent");
        assert_eq!(QueueModule::register_async(4), "absent");

        let module = QueueModule::for_root(4u32);
        assert_eq!(module.provider_count(), 1);
    }
}

#[test]
fn test_module_built_from_config() {
    let class = ConfiguredModule::configurable();
    let token = ConfiguredModule::options_token();

    assert_eq!(class.method_names(), ["configure", "configure_async"]);
    assert!(token.as_str().ends_with("_CONFIGURED"));

    let module =
        ConfiguredModule::configure_async(AsyncModuleOptions::new().use_existing("APP_NAME"));
    let deferred = module
        .options_provider::<String>(token)
        .and_then(|p| p.as_deferred())
        .unwrap();
    assert_eq!(deferred.existing, Some(ProviderToken::named("APP_NAME")));

    let module = ConfiguredModule::configure("billing".to_string());
    let provider = module.options_provider::<String>(token).unwrap();
    assert_eq!(provider.direct_value().map(String::as_str), Some("billing"));
}

#[test]
fn test_register_async_use_class() {
    let module = StorageModule::register_async(
        AsyncModuleOptions::new().use_class(UseClass::of::<StorageConfigService>()),
    );

    let deferred = module
        .options_provider::<StorageOptions>(StorageModule::options_token())
        .and_then(|p| p.as_deferred())
        .unwrap();
    let use_class = deferred.use_class.as_ref().unwrap();

    assert!(use_class.class().is::<StorageConfigService>());
    assert_eq!(use_class.instantiate().create_options().bucket, "uploads");
    assert!(deferred.factory.is_none());
    assert!(deferred.inject.is_empty());
}

#[tokio::test]
async fn test_register_async_factory_runs_with_injected_values() {
    let factory = Factory::from_async(|args: InjectedArgs| async move {
        let bucket = args[0].downcast_ref::<String>().cloned().unwrap_or_default();
        let region = args[1].downcast_ref::<String>().cloned().unwrap_or_default();
        StorageOptions { bucket, region }
    });
    let inject = vec![ProviderToken::named("BUCKET"), ProviderToken::named("REGION")];

    let module = StorageModule::register_async(
        AsyncModuleOptions::new()
            .use_factory(factory)
            .inject(inject.clone()),
    );

    let deferred = module
        .options_provider::<StorageOptions>(StorageModule::options_token())
        .and_then(|p| p.as_deferred())
        .unwrap();
    assert_eq!(deferred.inject, inject);

    let args: InjectedArgs = vec![
        Arc::new("assets".to_string()),
        Arc::new("us-west-2".to_string()),
    ];
    let options = deferred.factory.as_ref().unwrap().call(args).await;
    assert_eq!(options.bucket, "assets");
    assert_eq!(options.region, "us-west-2");
}

#[test]
fn test_dynamic_modules_as_imports() {
    let metadata = AppModule::metadata();

    assert_eq!(metadata.imports.len(), 2);
    assert!(metadata.imports[0].module().is::<StorageModule>());
    assert!(metadata.imports[1].module().is::<QueueModule>());

    match &metadata.imports[1] {
        ModuleImport::Dynamic(queue) => {
            let provider = queue
                .options_provider::<u32>(QueueModule::options_token())
                .unwrap();
            assert!(provider.as_deferred().unwrap().factory.is_some());
        }
        ModuleImport::Static(_) => panic!("Expected a dynamic import"),
    }
}

#[test]
fn test_ten_thousand_builds_yield_distinct_tokens() {
    let builder = ConfigurableModuleBuilder::<StorageOptions>::new();
    let tokens: HashSet<_> = (0..10_000).map(|_| builder.build().1).collect();

    assert_eq!(tokens.len(), 10_000);
}

#[test]
fn test_concurrent_builds_yield_distinct_tokens() {
    let handles: Vec<_> = (0..8)
        .map(|_| {
            thread::spawn(|| {
                (0..500)
                    .map(|_| ConfigurableModuleBuilder::<StorageOptions>::new().build().1)
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut tokens = HashSet::new();
    for handle in handles {
        for token in handle.join().unwrap() {
            assert!(tokens.insert(token));
        }
    }
    assert_eq!(tokens.len(), 4_000);
}

#[test]
fn test_concurrent_first_access_builds_class_once() {
    let handles: Vec<_> = (0..8)
        .map(|_| thread::spawn(|| QueueModule::options_token().clone()))
        .collect();

    let tokens: HashSet<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(tokens.len(), 1);
}

#[test]
fn test_providers_of_other_modules_survive_merge() {
    struct SharedModule;

    impl ModuleDefinition for SharedModule {
        fn metadata() -> ModuleMetadata {
            let flags: Arc<dyn Provider> = Arc::new(ProviderDefinition::direct(
                "FEATURE_FLAGS",
                Some(vec!["beta".to_string()]),
            ));

            ModuleMetadata::new()
                .with_shared_provider(flags)
                .with_provider(ClassProvider::of::<StorageClient>())
                .with_exports(vec![ProviderToken::named("FEATURE_FLAGS")])
        }
    }

    let (class, token) = ConfigurableModuleBuilder::<StorageOptions>::new().build();
    let module: DynamicModule = class.primary::<SharedModule>(storage_options());

    assert_eq!(module.provider_count(), 3);
    assert!(module.providers[0].token().matches_options(&token));
    let flags = module.providers[1]
        .downcast_ref::<ProviderDefinition<Vec<String>>>()
        .and_then(|p| p.direct_value())
        .unwrap();
    assert_eq!(flags, &vec!["beta".to_string()]);
    assert!(module.providers[2].is::<ClassProvider>());
    assert_eq!(module.exports, vec![ProviderToken::named("FEATURE_FLAGS")]);
}

#[test]
fn test_crate_version() {
    assert_eq!(elif_dynamic_module::version(), env!("CARGO_PKG_VERSION"));
}
