use std::{sync::Arc, time::SystemTime};

use kura::*;

// Define regular traits and implementor structs

trait Logger: Send + Sync {
    fn log(&self, content: &str);
}

trait DateLogger: Send + Sync {
    fn log_date(&self);
}

#[derive(Default)]
struct LoggerImpl;

impl Logger for LoggerImpl {
    fn log(&self, content: &str) {
        println!("{}", content);
    }
}

// The logger is not a constructor argument: it is filled by the registry
#[derive(Default)]
struct DateLoggerImpl {
    logger: Inject<dyn Logger>,
}

autowire!(DateLoggerImpl { logger });

impl DateLogger for DateLoggerImpl {
    fn log_date(&self) {
        let Some(logger) = self.logger.get() else {
            println!("no logger available");
            return;
        };
        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap();
        logger.log(&format!("{}s since epoch", now.as_secs()));
    }
}

fn main() -> Result<(), WiringError> {
    let registry = Registry::with_autowiring();

    // A single shared logger, bound to the trait object
    registry.bind_to_type::<dyn Logger>(Arc::new(LoggerImpl) as Arc<dyn Logger>);

    // A new date logger for each request, resolved through its trait
    registry.bind_factory_to_type::<dyn DateLogger, _>(|| {
        Autowired::new(DateLoggerImpl::default()).cast(|d| d as Arc<dyn DateLogger>)
    });

    let b: Arc<dyn DateLogger> = registry
        .try_resolve_type()?
        .expect("the date logger is bound");

    b.log_date();

    // The process-wide registry is independent
    assert!(shared().resolve_type::<dyn DateLogger>().is_none());

    Ok(())
}
