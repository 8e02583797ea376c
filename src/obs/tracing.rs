// self
use crate::{_prelude::*, http::HttpVerb};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

#[cfg(feature = "tracing")]
const BODY_PREVIEW_LIMIT: usize = 256;

/// A span builder used by API calls.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Creates a new span tagged with the remote method identifier.
	pub fn new(remote_method: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("webmetrics.call", method = remote_method);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = remote_method;

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

pub(crate) fn dispatching(remote_method: &str, verb: HttpVerb) {
	#[cfg(feature = "tracing")]
	tracing::trace!(method = remote_method, verb = verb.as_str(), "dispatching webmetrics call");
	#[cfg(not(feature = "tracing"))]
	let _ = (remote_method, verb);
}

pub(crate) fn signature_computed(len: usize) {
	#[cfg(feature = "tracing")]
	tracing::trace!(len, "computed request signature");
	#[cfg(not(feature = "tracing"))]
	let _ = len;
}

pub(crate) fn reserved_param_dropped(key: &str) {
	#[cfg(feature = "tracing")]
	tracing::warn!(key, "caller parameter collides with an injected field and was dropped");
	#[cfg(not(feature = "tracing"))]
	let _ = key;
}

pub(crate) fn request_url(url: &str) {
	#[cfg(feature = "tracing")]
	tracing::trace!(url, "built request URL");
	#[cfg(not(feature = "tracing"))]
	let _ = url;
}

pub(crate) fn response_status(status: u16) {
	#[cfg(feature = "tracing")]
	tracing::trace!(status, "received response");
	#[cfg(not(feature = "tracing"))]
	let _ = status;
}

pub(crate) fn following_redirect(location: &Url, hop: usize) {
	#[cfg(feature = "tracing")]
	tracing::trace!(location = %location, hop, "following redirect");
	#[cfg(not(feature = "tracing"))]
	let _ = (location, hop);
}

pub(crate) fn unparsable_body(body: &str) {
	#[cfg(feature = "tracing")]
	tracing::error!(body = body_preview(body), "response body is not valid JSON");
	#[cfg(not(feature = "tracing"))]
	let _ = body;
}

pub(crate) fn request_failed(err: &Error) {
	#[cfg(feature = "tracing")]
	match err.source() {
		Some(source) => tracing::error!(error = %err, source = %source, "webmetrics request failed"),
		None => tracing::error!(error = %err, "webmetrics request failed"),
	}
	#[cfg(not(feature = "tracing"))]
	let _ = err;
}

/// Truncates `body` to a bounded preview on a char boundary.
#[cfg(feature = "tracing")]
fn body_preview(body: &str) -> &str {
	if body.len() <= BODY_PREVIEW_LIMIT {
		return body;
	}

	let mut end = BODY_PREVIEW_LIMIT;

	while !body.is_char_boundary(end) {
		end -= 1;
	}

	&body[..end]
}
