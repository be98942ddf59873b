//! Per-query WebSocket
//!
//! Opens one browser WebSocket per query and forwards its events to the
//! chat controller. The socket and its handlers are owned here, so closing
//! (terminal frame, error or page cleanup) detaches the handlers before the
//! socket goes away and a late event from an old socket can never touch a
//! newer query.

use leptos::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, MessageEvent, WebSocket};

use super::global::GlobalState;

type Handler = Closure<dyn FnMut(JsValue)>;

struct ActiveSocket {
    id: u64,
    ws: WebSocket,
    // Kept alive while the socket can still call them
    _handlers: Vec<Handler>,
}

impl ActiveSocket {
    fn detach(&self) {
        self.ws.set_onopen(None);
        self.ws.set_onmessage(None);
        self.ws.set_onerror(None);
        self.ws.set_onclose(None);
    }
}

/// Owner of the (at most one) open streaming socket
#[derive(Clone)]
pub struct ChatSocket {
    url: String,
    active: Rc<RefCell<Option<ActiveSocket>>>,
    next_id: Rc<Cell<u64>>,
}

impl ChatSocket {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            active: Rc::new(RefCell::new(None)),
            next_id: Rc::new(Cell::new(0)),
        }
    }

    /// Start a query; blank queries and a query already in flight are ignored
    pub fn send_query(&self, state: GlobalState, query: &str) {
        match state.chat.try_update(|chat| chat.send(query)) {
            Some(Ok(Some(_))) => self.connect(state),
            Some(Ok(None)) | None => {}
            Some(Err(e)) => {
                web_sys::console::warn_1(&format!("Query not sent: {}", e).into());
            }
        }
    }

    /// Close the open socket, if any, and release its handlers
    pub fn close(&self) {
        let Some(active) = self.active.borrow_mut().take() else {
            return;
        };
        active.detach();
        let _ = active.ws.close();
        // Handlers may be on the stack right now; drop them on the next tick.
        wasm_bindgen_futures::spawn_local(async move {
            drop(active);
        });
    }

    fn is_current(&self, id: u64) -> bool {
        self.active
            .borrow()
            .as_ref()
            .is_some_and(|active| active.id == id)
    }

    fn connect(&self, state: GlobalState) {
        self.close();

        let ws = match WebSocket::new(&self.url) {
            Ok(ws) => ws,
            Err(e) => {
                web_sys::console::error_1(&format!("WebSocket connection failed: {:?}", e).into());
                state
                    .chat
                    .update(|chat| chat.on_transport_error("could not create WebSocket"));
                state.chat.update(|chat| chat.on_close());
                state.flush_notifications();
                return;
            }
        };

        let id = self.next_id.get();
        self.next_id.set(id + 1);

        // On open: send the request frame
        let socket = self.clone();
        let ws_open = ws.clone();
        let on_open: Handler = Closure::wrap(Box::new(move |_: JsValue| {
            if !socket.is_current(id) {
                return;
            }
            let request = state.chat.try_update(|chat| chat.on_open()).flatten();
            if let Some(request) = request {
                match request.to_json() {
                    Ok(json) => {
                        if let Err(e) = ws_open.send_with_str(&json) {
                            web_sys::console::error_1(&format!("WebSocket send failed: {:?}", e).into());
                        }
                    }
                    Err(e) => {
                        web_sys::console::error_1(&format!("Failed to encode query: {}", e).into());
                    }
                }
            }
        }));
        ws.set_onopen(Some(on_open.as_ref().unchecked_ref()));

        // On message: apply the frame, close on a terminal one
        let socket = self.clone();
        let on_message: Handler = Closure::wrap(Box::new(move |event: JsValue| {
            if !socket.is_current(id) {
                return;
            }
            let event: MessageEvent = event.unchecked_into();
            let Ok(text) = event.data().dyn_into::<js_sys::JsString>() else {
                return;
            };
            let text: String = text.into();

            let closes = state
                .chat
                .try_update(|chat| chat.on_frame(&text).closes_session())
                .unwrap_or(false);
            state.flush_notifications();
            if closes {
                socket.close();
                state.chat.update(|chat| chat.on_close());
            }
        }));
        ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));

        // On error
        let socket = self.clone();
        let on_error: Handler = Closure::wrap(Box::new(move |e: JsValue| {
            if !socket.is_current(id) {
                return;
            }
            web_sys::console::error_1(&format!("WebSocket error: {:?}", e).into());
            state
                .chat
                .update(|chat| chat.on_transport_error("WebSocket error event"));
            state.flush_notifications();
        }));
        ws.set_onerror(Some(on_error.as_ref().unchecked_ref()));

        // On close
        let socket = self.clone();
        let on_close: Handler = Closure::wrap(Box::new(move |event: JsValue| {
            if !socket.is_current(id) {
                return;
            }
            let event: CloseEvent = event.unchecked_into();
            web_sys::console::log_1(
                &format!("WebSocket closed: code={}, reason={}", event.code(), event.reason()).into(),
            );
            state.chat.update(|chat| chat.on_close());
            socket.close();
        }));
        ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));

        *self.active.borrow_mut() = Some(ActiveSocket {
            id,
            ws,
            _handlers: vec![on_open, on_message, on_error, on_close],
        });
    }
}
