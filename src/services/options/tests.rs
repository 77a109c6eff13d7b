use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use axum::http::{HeaderMap, Method, Uri};

use super::*;
use crate::services::request::RequestContext;

#[derive(Debug, Default)]
struct TestOptions {
    context: Option<RequestContext>,
    message: String,
}

fn request(registry: &Arc<OptionsRegistry>, id: &str) -> RequestContext {
    RequestContext::new(
        id,
        Method::GET,
        Uri::from_static("/"),
        HeaderMap::new(),
        Arc::clone(registry),
    )
}

fn counted(counter: &Arc<AtomicUsize>) -> OptionsBuilder<TestOptions> {
    let counter = Arc::clone(counter);
    OptionsBuilder::<TestOptions>::new().configure_async(move |name, o, _| {
        counter.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move {
            o.message.push_str(if name.is_empty() { "default" } else { name });
            Ok(())
        })
    })
}

#[tokio::test]
async fn configure_async_sees_request_context() {
    let registry = Arc::new(OptionsRegistry::new().add(
        OptionsBuilder::<TestOptions>::new().configure_async(|_, o, ctx| {
            Box::pin(async move {
                o.context = Some(ctx.clone());
                Ok(())
            })
        }),
    ));
    let ctx = request(&registry, "req-1");
    let _scope = ctx.enter();

    let options = ctx.get_options::<TestOptions>(Some(DEFAULT_NAME)).await.unwrap();

    assert_eq!(options.context.as_ref(), Some(&ctx));
}

struct DropCounter(Arc<AtomicUsize>);

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
struct Tracked {
    context: Option<RequestContext>,
    counter: Option<DropCounter>,
}

fn tracked(dropped: &Arc<AtomicUsize>) -> Arc<OptionsRegistry> {
    let dropped = Arc::clone(dropped);
    Arc::new(OptionsRegistry::new().add(
        OptionsBuilder::<Tracked>::new().configure_async(move |_, o, ctx| {
            let dropped = Arc::clone(&dropped);
            Box::pin(async move {
                o.context = Some(ctx.clone());
                o.counter = Some(DropCounter(dropped));
                Ok(())
            })
        }),
    ))
}

#[tokio::test]
async fn options_holding_the_context_are_released_when_the_scope_ends() {
    let dropped = Arc::new(AtomicUsize::new(0));
    let registry = tracked(&dropped);

    {
        let ctx = request(&registry, "req-1");
        let _scope = ctx.enter();

        let options = ctx.get_options::<Tracked>(None).await.unwrap();
        assert_eq!(options.context.as_ref(), Some(&ctx));
        drop(options);

        assert_eq!(dropped.load(Ordering::SeqCst), 0);
    }

    assert_eq!(dropped.load(Ordering::SeqCst), 1);
    assert_eq!(Arc::strong_count(&registry), 1);
}

#[tokio::test]
async fn cleared_scope_rebuilds_on_next_resolution() {
    let dropped = Arc::new(AtomicUsize::new(0));
    let registry = tracked(&dropped);
    let ctx = request(&registry, "req-1");

    let first = ctx.get_options::<Tracked>(None).await.unwrap();
    drop(first);
    ctx.scope().clear();

    assert_eq!(dropped.load(Ordering::SeqCst), 1);
    assert_eq!(ctx.scope().resolver_count(), 0);

    let _scope = ctx.enter();
    let second = ctx.get_options::<Tracked>(None).await.unwrap();
    assert!(second.counter.is_some());
}

#[tokio::test]
async fn configure_async_runs_last_in_registration_order() {
    let registry = Arc::new(
        OptionsRegistry::new().add(
            OptionsBuilder::<TestOptions>::new()
                .configure(|o| o.message.push('1'))
                .configure_async(|_, o, _| {
                    Box::pin(async move {
                        o.message.push('!');
                        Ok(())
                    })
                })
                .configure(|o| o.message.push('2'))
                .configure_async(|_, o, _| {
                    Box::pin(async move {
                        tokio::task::yield_now().await;
                        o.message.push('|');
                        Ok(())
                    })
                }),
        ),
    );
    let ctx = request(&registry, "req-1");

    let options = ctx.get_options::<TestOptions>(None).await.unwrap();

    assert_eq!(options.message, "12!|");
}

#[tokio::test]
async fn same_name_in_one_request_is_cached() {
    let runs = Arc::new(AtomicUsize::new(0));
    let registry = Arc::new(OptionsRegistry::new().add(counted(&runs)));
    let ctx = request(&registry, "req-1");

    let first = ctx.get_options::<TestOptions>(None).await.unwrap();
    let second = ctx.get_options::<TestOptions>(Some(DEFAULT_NAME)).await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert_eq!(second.message, "default");
}

#[tokio::test]
async fn different_names_get_independent_instances() {
    let runs = Arc::new(AtomicUsize::new(0));
    let registry = Arc::new(OptionsRegistry::new().add(counted(&runs)));
    let ctx = request(&registry, "req-1");

    let a = ctx.get_options::<TestOptions>(Some("a")).await.unwrap();
    let b = ctx.get_options::<TestOptions>(Some("b")).await.unwrap();

    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(a.message, "a");
    assert_eq!(b.message, "b");
    assert_eq!(runs.load(Ordering::SeqCst), 2);

    let resolver = ctx.scope().resolver::<TestOptions>(&registry).unwrap();
    assert_eq!(resolver.cached_names(), vec!["a", "b"]);
}

#[tokio::test]
async fn fresh_request_does_not_see_previous_cache() {
    let runs = Arc::new(AtomicUsize::new(0));
    let registry = Arc::new(OptionsRegistry::new().add(counted(&runs)));

    let first = request(&registry, "req-1")
        .get_options::<TestOptions>(None)
        .await
        .unwrap();
    let second = request(&registry, "req-2")
        .get_options::<TestOptions>(None)
        .await
        .unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn concurrent_resolutions_run_the_chain_once() {
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&runs);
    let registry = Arc::new(OptionsRegistry::new().add(
        OptionsBuilder::<TestOptions>::new().configure_async(move |_, o, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                tokio::task::yield_now().await;
                o.message.push('x');
                Ok(())
            })
        }),
    ));
    let ctx = request(&registry, "req-1");

    let (a, b) = tokio::join!(
        ctx.get_options::<TestOptions>(Some("shared")),
        ctx.get_options::<TestOptions>(Some("shared")),
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.message, "x");
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_configuration_is_not_cached_and_retries_from_scratch() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&attempts);
    let registry = Arc::new(
        OptionsRegistry::new().add(
            OptionsBuilder::<TestOptions>::new()
                .configure(|o| o.message.push('1'))
                .configure_async(move |name, o, _| {
                    let attempt = counter.fetch_add(1, Ordering::SeqCst);
                    Box::pin(async move {
                        o.message.push('!');
                        if attempt == 0 {
                            return Err(OptionsError::configure(name, "backend unavailable"));
                        }
                        Ok(())
                    })
                }),
        ),
    );
    let ctx = request(&registry, "req-1");

    let err = ctx.get_options::<TestOptions>(None).await.unwrap_err();
    assert!(matches!(err, OptionsError::Configure { ref message, .. } if message == "backend unavailable"));

    let resolver = ctx.scope().resolver::<TestOptions>(&registry).unwrap();
    assert!(resolver.cached_names().is_empty());

    let options = ctx.get_options::<TestOptions>(None).await.unwrap();
    assert_eq!(options.message, "1!");
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn validation_failure_skips_async_configurators() {
    let runs = Arc::new(AtomicUsize::new(0));
    let registry = Arc::new(
        OptionsRegistry::new().add(counted(&runs).validate(|o| !o.message.is_empty(), "message is required")),
    );
    let ctx = request(&registry, "req-1");

    let err = ctx.get_options::<TestOptions>(None).await.unwrap_err();

    assert!(matches!(err, OptionsError::Validation { .. }));
    assert_eq!(runs.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unregistered_type_is_an_error() {
    struct Unknown;

    let registry = Arc::new(OptionsRegistry::new());
    let ctx = request(&registry, "req-1");

    let err = ctx.get_options::<Unknown>(None).await.err().unwrap();

    assert!(matches!(err, OptionsError::NotRegistered { .. }));
    assert_eq!(ctx.scope().resolver_count(), 0);
}

#[tokio::test]
async fn explicitly_wired_factory_is_used() {
    struct Fixed;

    impl OptionsFactory<TestOptions> for Fixed {
        fn create(&self, name: &str) -> Result<TestOptions, OptionsError> {
            Ok(TestOptions {
                context: None,
                message: format!("fixed:{name}"),
            })
        }
    }

    let factory = RequestOptionsFactory::new(Arc::new(Fixed), Vec::new());
    let registry = Arc::new(OptionsRegistry::new().insert(factory));
    let ctx = request(&registry, "req-1");

    let options = ctx.get_options::<TestOptions>(Some("n")).await.unwrap();

    assert_eq!(options.message, "fixed:n");
}
