// OpenAPI specification generation
//
// Defines the OpenAPI spec served to Swagger UI by the API server.

use crate::api;
use crate::api::{ErrorResponse, ListResponse};
use gather_core::PaymentStatus;
use utoipa::OpenApi;

/// OpenAPI documentation for the Gather API
#[derive(OpenApi)]
#[openapi(
    paths(
        api::events::list_events,
        api::events::create_event,
        api::events::get_event,
        api::events::register_for_event,
        api::clubs::list_clubs,
        api::clubs::create_club,
        api::clubs::get_club,
        api::clubs::join_club,
        api::platform::create_contact_message,
        api::platform::get_home,
        api::platform::get_dashboard,
    ),
    components(
        schemas(
            api::events::EventResponse,
            api::events::EventDetailResponse,
            api::events::RegistrationResponse,
            api::events::CreateEventRequest,
            api::events::ListEventsQuery,
            api::clubs::ClubResponse,
            api::clubs::ClubDetailResponse,
            api::clubs::MembershipResponse,
            api::clubs::CreateClubRequest,
            api::clubs::ListClubsQuery,
            api::platform::ContactRequest,
            api::platform::ContactMessageResponse,
            api::platform::PlatformStats,
            api::platform::HomeResponse,
            api::platform::DashboardResponse,
            PaymentStatus,
            ErrorResponse,
            ListResponse<api::events::EventResponse>,
            ListResponse<api::clubs::ClubResponse>,
        )
    ),
    tags(
        (name = "events", description = "Event listing, creation and registration"),
        (name = "clubs", description = "Club listing, creation and membership"),
        (name = "platform", description = "Landing page, dashboard and contact form")
    ),
    info(
        title = "Gather API",
        version = "0.1.0",
        description = "Community events platform: clubs, events, and capacity-bounded registration",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
pub struct ApiDoc;
