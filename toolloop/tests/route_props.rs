//! Property tests for routing, phase transitions and the tool step.


use std::sync::Arc;

use proptest::prelude::*;
use serde_json::json;
use toolloop::{
    route, Dispatcher, Message, MessagesState, MockLlm, Phase, Route, ToolCall, ToolRegistry,
    WeatherTool,
};

fn arb_tool_call() -> impl Strategy<Value = ToolCall> {
    ("[a-z0-9]{6}", prop_oneof![Just("weather"), Just("weather_forecast")], "[a-z ]{0,12}")
        .prop_map(|(id, name, query)| ToolCall::new(id, name, json!({ "query": query })))
}

fn arb_plain_message() -> impl Strategy<Value = Message> {
    prop_oneof![
        "[a-zA-Z ]{0,20}".prop_map(|s| Message::system(s)),
        "[a-zA-Z ]{0,20}".prop_map(|s| Message::human(s)),
        "[a-zA-Z ]{0,20}".prop_map(|s| Message::assistant(s)),
        ("[a-z]{4}", "[a-zA-Z ]{0,20}", any::<bool>()).prop_map(|(id, text, err)| {
            if err {
                Message::tool_error(id, "weather", text)
            } else {
                Message::tool_result(id, "weather", text)
            }
        }),
    ]
}

fn arb_history() -> impl Strategy<Value = Vec<Message>> {
    prop::collection::vec(arb_plain_message(), 0..6)
}

fn registry() -> Arc<ToolRegistry> {
    Arc::new(
        ToolRegistry::builder()
            .register(WeatherTool::new())
            .unwrap()
            .build(),
    )
}

proptest! {
    #[test]
    fn last_message_without_calls_terminates(mut history in arb_history(), last in arb_plain_message()) {
        history.push(last);
        prop_assert_eq!(route(&history), Route::Terminate);
    }

    #[test]
    fn last_message_with_calls_invokes_tools(
        history in arb_history(),
        calls in prop::collection::vec(arb_tool_call(), 1..5),
        text in "[a-zA-Z ]{0,10}",
    ) {
        let mut log = history;
        log.push(Message::assistant_with_tool_calls(text, calls));
        prop_assert_eq!(route(&log), Route::InvokeTool);
        prop_assert_eq!(Phase::AwaitingModel.advance(route(&log)), Phase::AwaitingTool);
    }

    #[test]
    fn tool_step_always_returns_to_model(r in prop_oneof![Just(Route::InvokeTool), Just(Route::Terminate)]) {
        prop_assert_eq!(Phase::AwaitingTool.advance(r), Phase::AwaitingModel);
        prop_assert_eq!(Phase::Done.advance(r), Phase::Done);
    }

    #[test]
    fn execute_appends_one_result_per_call_in_order(
        history in arb_history(),
        calls in prop::collection::vec(arb_tool_call(), 0..6),
    ) {
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        let dispatcher = Dispatcher::new(Arc::new(MockLlm::with_no_tool_calls("x")), registry());
        let mut log = history;
        log.push(Message::assistant_with_tool_calls("", calls.clone()));
        let before = log.len();

        let out = rt.block_on(dispatcher.execute(MessagesState::new(log.clone()))).unwrap();
        let appended = &out.messages.as_slice()[before..];

        prop_assert_eq!(&out.messages.as_slice()[..before], log.as_slice());
        prop_assert_eq!(appended.len(), calls.len());
        for (msg, call) in appended.iter().zip(&calls) {
            match msg {
                Message::Tool { call_id, name, is_error, .. } => {
                    prop_assert_eq!(call_id, &call.id);
                    prop_assert_eq!(name, &call.name);
                    prop_assert_eq!(*is_error, call.name != "weather");
                }
                other => prop_assert!(false, "expected tool message, got {:?}", other),
            }
        }
    }
}
