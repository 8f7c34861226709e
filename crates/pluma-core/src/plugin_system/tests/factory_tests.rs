#![cfg(test)]

use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::factory::{ClassInfo, FactoryRegistry};
use crate::plugin_system::tests::{Counter, English, French, Greeter};

fn greeters() -> FactoryRegistry {
    FactoryRegistry::build("Greetings", "2.1.0", |factory| {
        factory
            .register::<dyn Greeter>("English", || Box::new(English))?
            .register::<dyn Greeter>("French", || Box::new(French))?;
        Ok(())
    })
}

#[test]
fn test_new_registry_is_empty() {
    let registry = FactoryRegistry::new("Empty", "0.1.0");
    assert_eq!(registry.name(), "Empty");
    assert_eq!(registry.version(), "0.1.0");
    assert_eq!(registry.class_count(), 0);
    assert!(registry.registration_error().is_none());
    match registry.class_name_at(0) {
        Err(PluginSystemError::IndexOutOfRange { index, count }) => {
            assert_eq!(index, 0);
            assert_eq!(count, 0);
        }
        other => panic!("Expected IndexOutOfRange, got {:?}", other),
    }
}

#[test]
fn test_classes_keep_registration_order() {
    let registry = greeters();
    assert_eq!(registry.class_count(), 2);
    assert_eq!(registry.class_name_at(0).unwrap(), "English");
    assert_eq!(registry.class_name_at(1).unwrap(), "French");
    assert!(matches!(
        registry.class_name_at(2),
        Err(PluginSystemError::IndexOutOfRange { index: 2, count: 2 })
    ));
    assert!(registry.contains("French"));
    assert!(!registry.contains("french"), "class names are case-sensitive");
}

#[test]
fn test_create_known_class() {
    let registry = greeters();
    let object = registry.create("French").expect("French is registered");
    assert_eq!(object.capability(), <dyn Greeter as crate::Capability>::ID);
    let greeter = object.downcast::<dyn Greeter>().expect("registered as Greeter");
    assert_eq!(greeter.greet(), "bonjour");
}

#[test]
fn test_create_unknown_class_is_not_found() {
    let registry = greeters();
    match registry.create("German") {
        Err(PluginSystemError::ClassNotFound {
            plugin_id,
            class_name,
        }) => {
            assert_eq!(plugin_id, "Greetings");
            assert_eq!(class_name, "German");
        }
        other => panic!("Expected ClassNotFound, got {:?}", other),
    }
}

#[test]
fn test_register_rejects_duplicates_and_empty_names() {
    let mut registry = greeters();

    let duplicate = registry.register::<dyn Greeter>("English", || Box::new(French));
    assert!(matches!(
        duplicate,
        Err(PluginSystemError::DuplicateClass { ref class_name, .. }) if class_name == "English"
    ));

    let empty = registry.register::<dyn Greeter>("", || Box::new(English));
    assert!(matches!(empty, Err(PluginSystemError::InvalidClassName { .. })));

    // The original entry is untouched
    assert_eq!(registry.class_count(), 2);
    let english = registry.create("English").unwrap().downcast::<dyn Greeter>().unwrap();
    assert_eq!(english.greet(), "hello");
}

#[test]
fn test_build_records_registration_failure() {
    let registry = FactoryRegistry::build("Broken", "1.0.0", |factory| {
        factory
            .register::<dyn Greeter>("Twice", || Box::new(English))?
            .register::<dyn Greeter>("Twice", || Box::new(English))?;
        Ok(())
    });
    let message = registry.registration_error().expect("failure recorded");
    assert!(message.contains("Twice"), "unexpected message: {}", message);
    assert_eq!(registry.class_count(), 1);
}

#[test]
fn test_capability_of_and_metadata() {
    struct Fixed;
    impl Counter for Fixed {
        fn value(&self) -> u32 {
            7
        }
    }

    let registry = FactoryRegistry::build("Mixed", "0.3.0", |factory| {
        factory
            .register::<dyn Greeter>("English", || Box::new(English))?
            .register::<dyn Counter>("Seven", || Box::new(Fixed))?;
        Ok(())
    });
    assert_eq!(registry.capability_of("Seven"), Some("pluma.tests.Counter/1"));
    assert_eq!(registry.capability_of("Missing"), None);

    let metadata = registry.metadata();
    assert_eq!(metadata.name, "Mixed");
    assert_eq!(metadata.version, "0.3.0");
    assert_eq!(metadata.class_names(), vec!["English", "Seven"]);
    assert_eq!(
        metadata.classes[1],
        ClassInfo {
            name: "Seven".to_string(),
            capability: "pluma.tests.Counter/1".to_string(),
        }
    );

    let json = serde_json::to_value(&metadata).expect("metadata serializes");
    assert_eq!(json["classes"][0]["name"], "English");
}

#[test]
fn test_constructor_panic_becomes_error() {
    let registry = FactoryRegistry::build("Fragile", "1.0.0", |factory| {
        factory
            .register::<dyn Greeter>("English", || Box::new(English))?
            .register::<dyn Greeter>("Broken", || -> Box<dyn Greeter> {
                panic!("no greeting today")
            })?;
        Ok(())
    });

    match registry.create("Broken") {
        Err(PluginSystemError::ConstructorPanicked {
            plugin_id,
            class_name,
            message,
        }) => {
            assert_eq!(plugin_id, "Fragile");
            assert_eq!(class_name, "Broken");
            assert_eq!(message, "no greeting today");
        }
        other => panic!("Expected ConstructorPanicked, got {:?}", other),
    }

    // Other classes are unaffected
    let english = registry.create("English").unwrap().downcast::<dyn Greeter>().unwrap();
    assert_eq!(english.greet(), "hello");
}

#[test]
fn test_build_records_registration_panic() {
    let registry = FactoryRegistry::build("Shaky", "1.0.0", |factory| {
        factory.register::<dyn Greeter>("English", || Box::new(English))?;
        panic!("gave up after {} class", factory.class_count());
    });
    assert_eq!(registry.registration_error(), Some("panic: gave up after 1 class"));
}
