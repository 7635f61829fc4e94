//! Broadcast fan-out across independent subscribers

use super::harness::{publisher, RunningSubscriber};
use crate::command::SubscriberProfile;
use orders_shared::transport::MemoryBroker;
use serde_json::json;

#[tokio::test]
async fn test_disjoint_vocabularies_see_the_same_command() {
    let broker = MemoryBroker::new();
    let mut greeter = RunningSubscriber::spawn(&broker, "subscriber-1", SubscriberProfile::Greeter).await;
    let mut calculator = RunningSubscriber::spawn(&broker, "subscriber-2", SubscriberProfile::Calculator).await;
    let publisher = publisher(&broker).await;

    publisher.submit(&json!({"command": "calculate"})).await.unwrap();

    let at_greeter = greeter.next_outcome().await;
    let at_calculator = calculator.next_outcome().await;

    assert_eq!(at_greeter.command, "calculate");
    assert_eq!(at_calculator.command, "calculate");
    assert!(!at_greeter.matched);
    assert!(at_calculator.matched);
    assert_eq!(at_calculator.result.message(), "Calculation result is 4");

    greeter.stop().await;
    calculator.stop().await;
}

#[tokio::test]
async fn test_every_subscriber_sees_every_command_in_order() {
    let broker = MemoryBroker::new();
    let mut greeter = RunningSubscriber::spawn(&broker, "subscriber-1", SubscriberProfile::Greeter).await;
    let mut calculator = RunningSubscriber::spawn(&broker, "subscriber-2", SubscriberProfile::Calculator).await;
    let publisher = publisher(&broker).await;

    let commands = ["sayHello", "sayGoodbye", "showDate", "calculate", "doBackflip"];
    for command in commands {
        publisher.submit(&json!({ "command": command })).await.unwrap();
    }

    for subscriber in [&mut greeter, &mut calculator] {
        for command in commands {
            assert_eq!(subscriber.next_outcome().await.command, command);
        }
    }

    let greeter_stats = greeter.stop().await;
    let calculator_stats = calculator.stop().await;
    assert_eq!(greeter_stats.dispatched, 5);
    assert_eq!(greeter_stats.unknown, 3);
    assert_eq!(calculator_stats.dispatched, 5);
    assert_eq!(calculator_stats.unknown, 3);
}

#[tokio::test]
async fn test_stopped_subscriber_does_not_affect_others() {
    let broker = MemoryBroker::new();
    let greeter = RunningSubscriber::spawn(&broker, "subscriber-1", SubscriberProfile::Greeter).await;
    let mut calculator = RunningSubscriber::spawn(&broker, "subscriber-2", SubscriberProfile::Calculator).await;
    let publisher = publisher(&broker).await;

    greeter.stop().await;
    assert_eq!(broker.subscriber_count("orders").await, 1);

    publisher.submit(&json!({"command": "sayGoodbye"})).await.unwrap();
    let outcome = calculator.next_outcome().await;
    assert_eq!(outcome.result.message(), "Goodbye, see you later!");

    calculator.stop().await;
}
