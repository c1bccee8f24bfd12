//! HTTP Handlers
//!
//! Capability checks live here, at the boundary: the use cases trust their
//! callers and the guard middleware has already authenticated the request.

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use uuid::Uuid;

use auth::application::config::AuthConfig;
use auth::application::guard::AuthContext;
use auth::application::token::TokenService;
use auth::domain::repository::AccountRepository;
use auth::domain::value_object::account_role::Capability;
use kernel::id::{AccountId, AffiliateId, ReferralId};
use platform::captcha::CaptchaVerifier;
use platform::cookie::{CookieConfig, extract_cookie, set_cookie_header};
use platform::notify::{NotificationGateway, TemplateStore};

use crate::application::{
    AffiliateConfig, Attribution, CreateAffiliateInput, CreateAffiliateUseCase,
    CreateReferralUseCase, DeleteAffiliateUseCase, DeleteReferralUseCase, ListReferralsUseCase,
    RegisterInput, RegisterUseCase, SetBlockedUseCase, UpdateAffiliateStatusUseCase,
    UpdateAffiliateUseCase, UpdateReferralUseCase,
};
use crate::domain::repository::{AffiliateRepository, EnrollmentRepository, ReferralRepository};
use crate::domain::value_object::commission::CommissionConfig;
use crate::error::{AffiliateError, AffiliateResult};
use crate::presentation::dto::{
    AffiliateResponse, AttributionQuery, CreateAffiliateRequest, CreateReferralRequest,
    ReferralResponse, RegisterRequest, RegisterResponse, SetBlockedRequest, UpdateAffiliateRequest,
    UpdateReferralRequest, UpdateStatusRequest, parse_affiliate_status, parse_rate_type,
};

/// Shared state for affiliate handlers
///
/// `P` is the partner store implementing all three repository traits, so
/// enrollment, profile, and referral operations share one backing pool.
pub struct AffiliateAppState<P, A, N>
where
    P: AffiliateRepository + ReferralRepository + EnrollmentRepository + Send + Sync + 'static,
    A: AccountRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    pub partners: Arc<P>,
    pub accounts: Arc<A>,
    pub gateway: Arc<N>,
    pub templates: Arc<TemplateStore>,
    pub captcha: Arc<CaptchaVerifier>,
    pub auth_config: Arc<AuthConfig>,
    pub config: Arc<AffiliateConfig>,
    pub tokens: Arc<TokenService>,
    pub cookie: Arc<CookieConfig>,
}

impl<P, A, N> Clone for AffiliateAppState<P, A, N>
where
    P: AffiliateRepository + ReferralRepository + EnrollmentRepository + Send + Sync + 'static,
    A: AccountRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            partners: self.partners.clone(),
            accounts: self.accounts.clone(),
            gateway: self.gateway.clone(),
            templates: self.templates.clone(),
            captcha: self.captcha.clone(),
            auth_config: self.auth_config.clone(),
            config: self.config.clone(),
            tokens: self.tokens.clone(),
            cookie: self.cookie.clone(),
        }
    }
}

fn require(context: &AuthContext, capability: Capability) -> AffiliateResult<()> {
    if context.allows(capability) {
        Ok(())
    } else {
        Err(AffiliateError::Forbidden)
    }
}

/// Client address for captcha verification, if a proxy forwarded it
fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")?
        .to_str()
        .ok()?
        .split(',')
        .next()
        .map(|addr| addr.trim().to_string())
}

// ============================================================================
// Registration (public)
// ============================================================================

/// POST /affiliates/register
pub async fn register<P, A, N>(
    State(state): State<AffiliateAppState<P, A, N>>,
    headers: HeaderMap,
    Json(req): Json<RegisterRequest>,
) -> AffiliateResult<(StatusCode, Json<RegisterResponse>)>
where
    P: AffiliateRepository + ReferralRepository + EnrollmentRepository + Send + Sync + 'static,
    A: AccountRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(
        state.partners.clone(),
        state.accounts.clone(),
        state.gateway.clone(),
        state.templates.clone(),
        state.captcha.clone(),
        state.auth_config.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(RegisterInput {
            first_name: req.first_name,
            last_name: req.last_name,
            company: req.company,
            email: req.email,
            password: req.password,
            captcha_token: req.captcha_token,
            remote_addr: forwarded_for(&headers),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            account_id: *output.account_id.as_uuid(),
            affiliate_id: *output.affiliate_id.as_uuid(),
            slug: output.slug.as_str().to_string(),
        }),
    ))
}

// ============================================================================
// Tracking Links (public)
// ============================================================================

/// GET /affiliates/track/{slug}
///
/// Stores the attribution cookie so a later anonymous referral can be
/// credited. Unknown or inactive slugs 404 without setting anything.
pub async fn track<P, A, N>(
    State(state): State<AffiliateAppState<P, A, N>>,
    Path(slug): Path<String>,
) -> AffiliateResult<Response>
where
    P: AffiliateRepository + ReferralRepository + EnrollmentRepository + Send + Sync + 'static,
    A: AccountRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    let slug = crate::domain::value_object::slug::Slug::new(slug)
        .map_err(|_| AffiliateError::NotFound)?;

    let affiliate = AffiliateRepository::find_by_slug(state.partners.as_ref(), &slug)
        .await?
        .filter(|a| a.status.can_refer())
        .ok_or(AffiliateError::NotFound)?;

    let cookie = set_cookie_header(&state.cookie, affiliate.slug.as_str());
    Ok(([(header::SET_COOKIE, cookie)], StatusCode::NO_CONTENT).into_response())
}

// ============================================================================
// Referral Submission
// ============================================================================

/// POST /referrals/public (anonymous, attributed by slug or cookie)
pub async fn create_referral_public<P, A, N>(
    State(state): State<AffiliateAppState<P, A, N>>,
    Query(query): Query<AttributionQuery>,
    headers: HeaderMap,
    Json(req): Json<CreateReferralRequest>,
) -> AffiliateResult<(StatusCode, Json<ReferralResponse>)>
where
    P: AffiliateRepository + ReferralRepository + EnrollmentRepository + Send + Sync + 'static,
    A: AccountRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    let attribution = Attribution {
        slug_param: query.slug,
        cookie: extract_cookie(&headers, &state.cookie.name),
    };

    let use_case = CreateReferralUseCase::new(state.partners.clone(), state.partners.clone());
    let referral = use_case.execute_anonymous(&attribution, req.party).await?;

    Ok((
        StatusCode::CREATED,
        Json(ReferralResponse::from_referral(referral, false)),
    ))
}

/// POST /referrals (guarded, affiliate submits under their own profile)
pub async fn create_referral<P, A, N>(
    State(state): State<AffiliateAppState<P, A, N>>,
    Extension(context): Extension<AuthContext>,
    Json(req): Json<CreateReferralRequest>,
) -> AffiliateResult<(StatusCode, Json<ReferralResponse>)>
where
    P: AffiliateRepository + ReferralRepository + EnrollmentRepository + Send + Sync + 'static,
    A: AccountRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    let use_case = CreateReferralUseCase::new(state.partners.clone(), state.partners.clone());
    let referral = use_case
        .execute_authenticated(&context.account_id, req.party)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ReferralResponse::from_referral(referral, false)),
    ))
}

// ============================================================================
// Referral Review
// ============================================================================

/// GET /referrals (guarded)
pub async fn list_referrals<P, A, N>(
    State(state): State<AffiliateAppState<P, A, N>>,
    Extension(context): Extension<AuthContext>,
) -> AffiliateResult<Json<Vec<ReferralResponse>>>
where
    P: AffiliateRepository + ReferralRepository + EnrollmentRepository + Send + Sync + 'static,
    A: AccountRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    let use_case = ListReferralsUseCase::new(state.partners.clone(), state.partners.clone());
    let listed = use_case.execute(&context).await?;

    let include_internal = context.allows(Capability::ReadAll);
    Ok(Json(
        listed
            .into_iter()
            .map(|r| ReferralResponse::from_referral(r, include_internal))
            .collect(),
    ))
}

/// PATCH /referrals/{id} (guarded, staff)
pub async fn update_referral<P, A, N>(
    State(state): State<AffiliateAppState<P, A, N>>,
    Extension(context): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateReferralRequest>,
) -> AffiliateResult<Json<ReferralResponse>>
where
    P: AffiliateRepository + ReferralRepository + EnrollmentRepository + Send + Sync + 'static,
    A: AccountRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    require(&context, Capability::WriteAll)?;

    let update = req.into_update().map_err(AffiliateError::Validation)?;
    let use_case = UpdateReferralUseCase::new(
        state.partners.clone(),
        state.partners.clone(),
        state.accounts.clone(),
        state.gateway.clone(),
        state.templates.clone(),
    );
    let referral = use_case.execute(&ReferralId::from_uuid(id), update).await?;

    Ok(Json(ReferralResponse::from_referral(referral, true)))
}

/// DELETE /referrals/{id} (guarded, staff)
pub async fn delete_referral<P, A, N>(
    State(state): State<AffiliateAppState<P, A, N>>,
    Extension(context): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> AffiliateResult<StatusCode>
where
    P: AffiliateRepository + ReferralRepository + EnrollmentRepository + Send + Sync + 'static,
    A: AccountRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    require(&context, Capability::WriteAll)?;

    DeleteReferralUseCase::new(state.partners.clone())
        .execute(&ReferralId::from_uuid(id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Affiliate Profiles
// ============================================================================

/// GET /affiliates/me (guarded, affiliate's own profile)
pub async fn my_profile<P, A, N>(
    State(state): State<AffiliateAppState<P, A, N>>,
    Extension(context): Extension<AuthContext>,
) -> AffiliateResult<Json<AffiliateResponse>>
where
    P: AffiliateRepository + ReferralRepository + EnrollmentRepository + Send + Sync + 'static,
    A: AccountRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    let affiliate = state
        .partners
        .find_by_account_id(&context.account_id)
        .await?
        .ok_or(AffiliateError::NotFound)?;

    Ok(Json(affiliate.into()))
}

/// POST /affiliates (guarded, admin provisioning)
pub async fn create_affiliate<P, A, N>(
    State(state): State<AffiliateAppState<P, A, N>>,
    Extension(context): Extension<AuthContext>,
    Json(req): Json<CreateAffiliateRequest>,
) -> AffiliateResult<(StatusCode, Json<AffiliateResponse>)>
where
    P: AffiliateRepository + ReferralRepository + EnrollmentRepository + Send + Sync + 'static,
    A: AccountRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    require(&context, Capability::AdminManage)?;

    let defaults = CommissionConfig::default();
    let commission = CommissionConfig {
        rate_type: req
            .rate_type
            .as_deref()
            .map(parse_rate_type)
            .transpose()
            .map_err(AffiliateError::Validation)?
            .unwrap_or(defaults.rate_type),
        rate_value: req.rate_value.unwrap_or(defaults.rate_value),
        payment_term_days: req.payment_term_days.unwrap_or(defaults.payment_term_days),
        currency: req.currency.unwrap_or(defaults.currency),
    };

    let use_case = CreateAffiliateUseCase::new(
        state.partners.clone(),
        state.accounts.clone(),
        state.gateway.clone(),
        state.templates.clone(),
        state.config.clone(),
    );
    let affiliate = use_case
        .execute(CreateAffiliateInput {
            first_name: req.first_name,
            last_name: req.last_name,
            company: req.company,
            email: req.email,
            password: req.password,
            commission,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(affiliate.into())))
}

/// PATCH /affiliates/{id} (guarded, staff)
pub async fn update_affiliate<P, A, N>(
    State(state): State<AffiliateAppState<P, A, N>>,
    Extension(context): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateAffiliateRequest>,
) -> AffiliateResult<Json<AffiliateResponse>>
where
    P: AffiliateRepository + ReferralRepository + EnrollmentRepository + Send + Sync + 'static,
    A: AccountRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    require(&context, Capability::WriteAll)?;

    let update = req.into_update().map_err(AffiliateError::Validation)?;
    let affiliate = UpdateAffiliateUseCase::new(state.partners.clone())
        .execute(&AffiliateId::from_uuid(id), update)
        .await?;

    Ok(Json(affiliate.into()))
}

/// PATCH /affiliates/{id}/status (guarded, staff)
pub async fn update_affiliate_status<P, A, N>(
    State(state): State<AffiliateAppState<P, A, N>>,
    Extension(context): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> AffiliateResult<Json<AffiliateResponse>>
where
    P: AffiliateRepository + ReferralRepository + EnrollmentRepository + Send + Sync + 'static,
    A: AccountRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    require(&context, Capability::WriteAll)?;

    let status = parse_affiliate_status(&req.status).map_err(AffiliateError::Validation)?;
    let use_case = UpdateAffiliateStatusUseCase::new(
        state.partners.clone(),
        state.accounts.clone(),
        state.gateway.clone(),
        state.templates.clone(),
    );
    let affiliate = use_case.execute(&AffiliateId::from_uuid(id), status).await?;

    Ok(Json(affiliate.into()))
}

/// DELETE /affiliates/{id} (guarded, admin)
pub async fn delete_affiliate<P, A, N>(
    State(state): State<AffiliateAppState<P, A, N>>,
    Extension(context): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> AffiliateResult<StatusCode>
where
    P: AffiliateRepository + ReferralRepository + EnrollmentRepository + Send + Sync + 'static,
    A: AccountRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    require(&context, Capability::AdminManage)?;

    DeleteAffiliateUseCase::new(state.partners.clone(), state.partners.clone())
        .execute(&AffiliateId::from_uuid(id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Account Administration
// ============================================================================

/// PUT /accounts/{id}/blocked (guarded, admin)
pub async fn set_blocked<P, A, N>(
    State(state): State<AffiliateAppState<P, A, N>>,
    Extension(context): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<SetBlockedRequest>,
) -> AffiliateResult<StatusCode>
where
    P: AffiliateRepository + ReferralRepository + EnrollmentRepository + Send + Sync + 'static,
    A: AccountRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    require(&context, Capability::AdminManage)?;

    SetBlockedUseCase::new(state.accounts.clone())
        .execute(&AccountId::from_uuid(id), req.blocked)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
