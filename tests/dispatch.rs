mod support;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::json;
use sourced_cqrs::{
    Cqrs, CqrsError, Definition, Delivery, Fields, Handler, HandlerBindings, Message,
    MessageKind, Resumption,
};
use support::bank::{define_bank, Account, Deposit, Ledger};

fn bank() -> Cqrs {
    support::init_tracing();
    let cqrs = Cqrs::new();
    define_bank(&cqrs).unwrap();
    cqrs
}

#[test]
fn dispatcher_names_are_unique() {
    let cqrs = Cqrs::new();
    let created = cqrs.create_message_dispatcher("accounts").unwrap();
    assert_eq!(created.name(), "accounts");

    let result = cqrs.create_message_dispatcher("accounts");
    assert!(matches!(result, Err(CqrsError::DuplicateDispatcher(ref n)) if n == "accounts"));

    cqrs.create_message_dispatcher("ledger").unwrap();
    assert_eq!(cqrs.message_dispatchers().unwrap(), vec!["accounts", "ledger"]);
}

#[test]
fn get_missing_dispatcher_fails() {
    let cqrs = Cqrs::new();
    let result = cqrs.get_message_dispatcher("nowhere");
    assert!(matches!(result, Err(CqrsError::NotFound(ref n)) if n == "nowhere"));
}

#[test]
fn dispatcher_handles_share_bindings() {
    let cqrs = bank();
    let mut account = Account::new();
    cqrs.i_handle_commands(&["OpenAccount"], &mut account).unwrap();

    cqrs.create_message_dispatcher("accounts").unwrap();
    cqrs.get_message_dispatcher("accounts")
        .unwrap()
        .scan(&account)
        .unwrap();

    let dispatcher = cqrs.get_message_dispatcher("accounts").unwrap();
    assert_eq!(dispatcher.commands().unwrap(), vec!["OpenAccount"]);
}

#[test]
fn scanning_a_second_handler_for_a_command_fails() {
    let cqrs = bank();
    let mut first = Account::new();
    let mut second = Account::new();
    cqrs.i_handle_commands(&["OpenAccount"], &mut first).unwrap();
    cqrs.i_handle_commands(&["OpenAccount"], &mut second).unwrap();

    let dispatcher = cqrs.create_message_dispatcher("accounts").unwrap();
    dispatcher.scan(&first).unwrap();
    let result = dispatcher.scan(&second);
    assert!(matches!(result, Err(CqrsError::DuplicateHandler(ref c)) if c == "OpenAccount"));

    // Another dispatcher may bind the same command.
    let other = cqrs.create_message_dispatcher("replica").unwrap();
    other.scan(&second).unwrap();
}

#[test]
fn scanning_an_unbound_object_is_a_no_op() {
    let cqrs = bank();
    let ledger = Ledger::new();
    let dispatcher = cqrs.create_message_dispatcher("ledger").unwrap();

    dispatcher.scan(&ledger).unwrap().scan(&Account::new()).unwrap();
    assert!(dispatcher.commands().unwrap().is_empty());
}

#[test]
fn unrouted_commands_have_no_effect() {
    let cqrs = bank();
    let mut account = Account::new();
    cqrs.i_handle_commands(&["OpenAccount"], &mut account).unwrap();
    let dispatcher = cqrs.create_message_dispatcher("accounts").unwrap();
    dispatcher.scan(&account).unwrap();

    // Defined but not bound.
    let deposit = Message::from_typed(
        MessageKind::Command,
        &Deposit {
            id: "acc-1".into(),
            amount: 10,
        },
    )
    .unwrap();
    let delivery = dispatcher.send_command(&deposit).unwrap();
    assert!(delivery.is_unrouted());

    // Never defined at all.
    let stray = Message::command("Stray", Fields::new());
    assert!(dispatcher.send_command(&stray).unwrap().is_unrouted());

    assert_eq!(account.state().balance, 0);
}

#[test]
fn commands_route_to_the_scanned_handler() {
    let cqrs = bank();
    let mut account = Account::new();
    cqrs.i_handle_commands(&["OpenAccount", "Deposit"], &mut account)
        .unwrap();
    cqrs.i_apply_events(&["AccountOpened", "Deposited"], &mut account)
        .unwrap();

    let mut ledger = Ledger::new();
    cqrs.i_subscribe_to(&["AccountOpened", "Deposited"], &mut ledger)
        .unwrap();

    let dispatcher = cqrs.create_message_dispatcher("accounts").unwrap();
    dispatcher.scan(&account).unwrap();

    let open = cqrs
        .new_command("OpenAccount", vec![json!("acc-1"), json!("ada")])
        .unwrap();
    let mut events = dispatcher.send_command(&open).unwrap().run_to_end();

    let deposit = cqrs
        .new_command("Deposit", vec![json!("acc-1"), json!(25)])
        .unwrap();

    // The deposit handler reads state when invoked, so apply the opening first.
    for event in &events {
        account.apply(event);
        let subscriber = ledger_handler(&ledger, event.name());
        subscriber.invoke(event);
    }
    let deposited = dispatcher.send_command(&deposit).unwrap().run_to_end();
    for event in &deposited {
        account.apply(event);
        ledger_handler(&ledger, event.name()).invoke(event);
    }
    events.extend(deposited);

    let names: Vec<&str> = events.iter().map(|e| e.name()).collect();
    assert_eq!(names, vec!["AccountOpened", "Deposited"]);
    assert!(events.iter().all(|e| e.kind() == MessageKind::Event));

    let state = account.state();
    assert_eq!(state.id, "acc-1");
    assert_eq!(state.owner, "ada");
    assert_eq!(state.balance, 25);

    assert_eq!(
        ledger.entries(),
        vec![
            r#"opened "acc-1" for "ada""#.to_string(),
            r#"deposited 25 into "acc-1""#.to_string(),
        ]
    );
}

fn ledger_handler(ledger: &Ledger, event: &str) -> Handler {
    use sourced_cqrs::HandlerHost;
    assert!(ledger.bindings().subscribes_to(event));
    ledger.handler(event).unwrap()
}

#[test]
fn resumable_handlers_are_driven_by_the_caller() {
    let cqrs = bank();
    let steps = Arc::new(AtomicUsize::new(0));

    struct Stepper {
        bindings: HandlerBindings,
        steps: Arc<AtomicUsize>,
    }

    impl Stepper {
        fn deposit(&self) -> Handler {
            let steps = Arc::clone(&self.steps);
            Handler::resumable(move |_| {
                let steps = Arc::clone(&steps);
                Resumption::from_fn(move || {
                    let n = steps.fetch_add(1, Ordering::SeqCst);
                    (n < 3).then(|| Message::event("Tick", Fields::new().with("n", n)))
                })
            })
        }
    }

    sourced_cqrs::handlers!(Stepper, bindings { "Deposit" => deposit });

    let mut stepper = Stepper {
        bindings: HandlerBindings::new(),
        steps: Arc::clone(&steps),
    };
    cqrs.i_handle_commands(&["Deposit"], &mut stepper).unwrap();
    let dispatcher = cqrs.create_message_dispatcher("steps").unwrap();
    dispatcher.scan(&stepper).unwrap();

    let deposit = cqrs
        .new_command("Deposit", vec![json!("acc-1"), json!(1)])
        .unwrap();
    let mut resumption = match dispatcher.send_command(&deposit).unwrap() {
        Delivery::Suspended(resumption) => resumption,
        other => panic!("expected a suspended handler, got {:?}", other),
    };
    assert_eq!(steps.load(Ordering::SeqCst), 0);

    assert!(resumption.resume().is_some());
    assert_eq!(steps.load(Ordering::SeqCst), 1);
    assert_eq!(resumption.count(), 2);
}

#[test]
fn end_to_end_on_the_global_registry() {
    support::init_tracing();
    let cqrs = sourced_cqrs::global();
    assert_eq!(sourced_cqrs::VERSION, "0.1.0");

    cqrs.define_event(Definition::fields("Created", ["id"])).unwrap();
    cqrs.define_command(Definition::fields("Create", ["id"])).unwrap();

    struct A {
        bindings: HandlerBindings,
        received: Arc<Mutex<Vec<Message>>>,
    }

    impl A {
        fn create(&self) -> Handler {
            let received = Arc::clone(&self.received);
            Handler::resumable(move |command| {
                received.lock().unwrap().push(command.clone());
                Resumption::done()
            })
        }
    }

    sourced_cqrs::handlers!(A, bindings { "Create" => create });

    let mut a = A {
        bindings: HandlerBindings::new(),
        received: Arc::new(Mutex::new(Vec::new())),
    };
    cqrs.i_handle_commands(&["Create"], &mut a).unwrap();

    let d = cqrs.create_message_dispatcher("d").unwrap();
    d.scan(&a).unwrap();

    let create = cqrs.new_command("Create", vec![json!(7)]).unwrap();
    d.send_command(&create).unwrap();

    let received = a.received.lock().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].name(), "Create");
    assert_eq!(received[0].field::<u32>("id").unwrap(), 7);

    // The same instance is reachable by name from anywhere in the process.
    assert!(sourced_cqrs::global()
        .get_message_dispatcher("d")
        .unwrap()
        .handles("Create")
        .unwrap());
}
