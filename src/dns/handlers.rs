use crate::config::SharedConfig;
use crate::dns::dispatch::{Dispatcher, Question};
use crate::dns::reply::Reply;
use crate::error::Error;
use crate::rebind_store::DynRebindStore;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{error, info};
use trust_dns_proto::op::{Header, ResponseCode};
use trust_dns_proto::rr::Record;
use trust_dns_server::authority::MessageResponseBuilder;
use trust_dns_server::server::{Request, RequestHandler, ResponseHandler, ResponseInfo};

/// Adapts the protocol independent [`Dispatcher`] to `trust-dns-server` requests.
#[derive(Clone)]
pub struct Handler {
    dispatcher: Dispatcher,
}

impl Handler {
    pub(super) fn new(config: SharedConfig, rebind_store: DynRebindStore) -> Self {
        Handler {
            dispatcher: Dispatcher::new(config, rebind_store),
        }
    }

    fn dispatch_request(&self, request: &Request) -> Result<Reply, Error> {
        let query = request.query();
        let questions = [Question {
            name: query.name().to_string(),
            query_type: query.query_type(),
        }];
        panic::catch_unwind(AssertUnwindSafe(|| self.dispatcher.dispatch(&questions)))
            .map_err(|cause| Error::HandlerPanic(panic_message(cause.as_ref())))?
    }

    async fn send_reply<R: ResponseHandler>(
        &self,
        request: &Request,
        mut response_handle: R,
        reply: &Reply,
    ) -> Result<ResponseInfo, Error> {
        let records: Vec<Record> = reply.answers();
        let mut header = Header::response_from_request(request.header());
        header.set_authoritative(reply.is_authoritative());
        header.set_response_code(reply.response_code());
        let builder = MessageResponseBuilder::from_message_request(request);
        let response = builder.build(header, records.iter(), &[], &[], &[]);
        Ok(response_handle.send_response(response).await?)
    }
}

fn panic_message(cause: &(dyn Any + Send)) -> String {
    if let Some(s) = cause.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = cause.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown cause".to_string()
    }
}

#[async_trait::async_trait]
impl RequestHandler for Handler {
    async fn handle_request<R: ResponseHandler>(
        &self,
        request: &Request,
        response_handle: R,
    ) -> ResponseInfo {
        let mut header = Header::response_from_request(request.header());
        header.set_response_code(ResponseCode::ServFail);

        let reply = match self.dispatch_request(request) {
            Ok(reply) => reply,
            Err(error) => {
                // Nothing is sent; the client's resolver retries or times out.
                error!(
                    src = %request.src(),
                    id = request.id(),
                    question = %request.query().name(),
                    qtype = %request.query().query_type(),
                    "dropping DNS request: {:?}",
                    error
                );
                return header.into();
            }
        };

        info!(src = %request.src(), id = request.id(), "sending {reply}");
        match self.send_reply(request, response_handle, &reply).await {
            Ok(info) => info,
            Err(error) => {
                error!("error while replying to DNS request: {:?}", error);
                header.into()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_messages() {
        let cause = panic::catch_unwind(|| panic!("boom")).unwrap_err();
        assert_eq!(panic_message(cause.as_ref()), "boom");

        let cause = panic::catch_unwind(|| panic!("{} {}", "formatted", 1)).unwrap_err();
        assert_eq!(panic_message(cause.as_ref()), "formatted 1");

        let cause = panic::catch_unwind(|| std::panic::panic_any(7_u8)).unwrap_err();
        assert_eq!(panic_message(cause.as_ref()), "unknown cause");
    }
}
