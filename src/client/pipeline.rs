//! Validate, evaluate, and submit-data pipeline over authenticated calls.
//!
//! [`Client::evaluate`] runs the local validators first and issues no network call when they
//! fail. A pipeline run takes one bearer token from the shared cache and uses it for both
//! authenticated calls, so it performs at most one bootstrap call and at most two authenticated
//! calls even when the API issues tokens that already sit inside the renewal window.

// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	client::Client,
	error::ErrorCode,
	http::{Headers, HttpResponse, HttpTransport, header},
	lead::{
		self, Evaluation, EvaluationPayload, LEAD_DATA, LEAD_EVALUATION, LeadDataPayload,
		LeadOutcome, LeadRequest, LeadValidator, RequestId,
	},
	obs::{self, CallKind, CallOutcome, CallSpan},
	resolve::Endpoint,
};

const BEARER_PREFIX: &str = "Bearer";

impl<T, V> Client<T, V>
where
	T: ?Sized + HttpTransport,
	V: LeadValidator,
{
	/// Runs the full lead pipeline and reports both the request ID and any error.
	///
	/// Duplicated or existing leads stop after evaluation with the issued request ID and an
	/// advisory code; their data is never submitted.
	pub async fn evaluate<D>(&self, request: &LeadRequest<D>) -> LeadOutcome
	where
		D: Serialize,
	{
		const KIND: CallKind = CallKind::Evaluate;

		let span = CallSpan::new(KIND, "evaluate");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let outcome = span
			.instrument(async move {
				let full_data = match lead::validate_lead(self.validator.as_ref(), request) {
					Ok(full_data) => full_data,
					Err(e) => {
						obs::trace_debug!(error = %e, "Lead rejected by local validation.");

						return LeadOutcome::failed(e);
					},
				};
				let token = match self.token_cache.token(self).await {
					Ok(token) => token,
					Err(e) => return LeadOutcome::failed(e),
				};
				let Evaluation { request_id, status } =
					match self.evaluate_with(&token, &request.curp, &request.email).await {
						Ok(evaluation) => evaluation,
						Err(e) => return LeadOutcome::failed(e),
					};

				if let Some(advisory) = status.advisory() {
					return LeadOutcome::partial(request_id, advisory);
				}

				match self.submit_with(&token, &full_data, &request_id).await {
					Ok(()) => LeadOutcome::success(request_id),
					Err(e) => LeadOutcome::partial(request_id, e),
				}
			})
			.await;

		if outcome.is_success() {
			obs::record_call_outcome(KIND, CallOutcome::Success);
		} else {
			obs::record_call_outcome(KIND, CallOutcome::Failure);
		}

		outcome
	}

	/// Submits CURP and e-mail to the evaluation endpoint.
	pub async fn lead_evaluation(&self, curp: &str, email: &str) -> Result<Evaluation> {
		let token = self.token_cache.token(self).await?;

		self.evaluate_with(&token, curp, email).await
	}

	/// Submits the encoded full data for a previously evaluated lead.
	pub async fn lead_data(&self, full_data: &Value, request_id: &RequestId) -> Result<()> {
		let token = self.token_cache.token(self).await?;

		self.submit_with(&token, full_data, request_id).await
	}

	async fn evaluate_with(
		&self,
		token: &TokenSecret,
		curp: &str,
		email: &str,
	) -> Result<Evaluation> {
		let body = serde_json::to_vec(&EvaluationPayload { curp, email })
			.map_err(|_| ErrorCode::GENERAL_ERROR)?;
		let response = self
			.call_endpoint(
				CallKind::LeadEvaluation,
				&LEAD_EVALUATION,
				&self.endpoints.lead_evaluation,
				token,
				body,
			)
			.await?;

		lead::resolve_evaluation_response(&response.body, curp, email)
	}

	async fn submit_with(
		&self,
		token: &TokenSecret,
		full_data: &Value,
		request_id: &RequestId,
	) -> Result<()> {
		let body = serde_json::to_vec(&LeadDataPayload { full_data, request_id })
			.map_err(|_| ErrorCode::INVALID_FULL_DATA_FORMAT)?;
		let response = self
			.call_endpoint(CallKind::LeadData, &LEAD_DATA, &self.endpoints.lead_data, token, body)
			.await?;

		lead::resolve_lead_data_response(&response.body, request_id)
	}

	/// Posts `body` with `token` as bearer, returning the response only when its status is not
	/// classified as a failure by `endpoint`.
	async fn call_endpoint(
		&self,
		kind: CallKind,
		endpoint: &Endpoint,
		url: &Url,
		token: &TokenSecret,
		body: Vec<u8>,
	) -> Result<HttpResponse> {
		let span = CallSpan::new(kind, endpoint.path);

		obs::record_call_outcome(kind, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let mut headers = Headers::new();

				headers.insert(
					header::AUTHORIZATION.into(),
					format!("{BEARER_PREFIX} {}", token.expose()),
				);
				headers.insert(header::CONTENT_TYPE.into(), header::APPLICATION_JSON.into());

				let response = self.transport.post(url, &headers, body).await.map_err(|_e| {
					obs::trace_warn!(error = %_e, "Authenticated transport failed.");

					ErrorCode::UNABLE_TO_MAKE_CONNECTION
				})?;

				match endpoint.classify_status(&response) {
					Some(code) => {
						obs::trace_debug!(
							status = response.status,
							error = %code,
							"API call failed."
						);

						Err(code)
					},
					None => Ok(response),
				}
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(kind, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(kind, CallOutcome::Failure),
		}

		result
	}
}
