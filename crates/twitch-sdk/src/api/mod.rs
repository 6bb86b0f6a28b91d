//! Typed bindings for the Helix REST API.
//!
//! One file per resource; each request struct knows how to split its
//! fields into query pairs vs. JSON body, and each method delegates to
//! the transport verb the endpoint uses.

mod ads;
mod bits;
mod channel_points;
mod channels;
mod chat;
mod clips;
mod eventsub;
mod games;
mod goals;
mod moderation;
mod polls;
mod predictions;
mod raids;
mod search;
mod streams;
mod subscriptions;
mod teams;
mod users;
mod videos;
mod whispers;

pub mod models;

pub use ads::{AdSchedule, CommercialStarted, SnoozeResult};
pub use bits::{
    BitsLeaderboardEntry, BitsLeaderboardResponse, Cheermote, CheermoteTier,
    ExtensionTransaction, GetBitsLeaderboardRequest, GetExtensionTransactionsRequest,
};
pub use channel_points::{
    CreateCustomRewardRequest, CustomReward, CustomRewardImage, GetCustomRewardRedemptionRequest,
    GetCustomRewardsRequest, GlobalCooldownSetting, MaxPerStreamSetting,
    MaxPerUserPerStreamSetting, RewardRedemption, UpdateCustomRewardRequest,
    UpdateRedemptionStatusRequest,
};
pub use channels::{
    Channel, ChannelEditor, ChannelFollowersResponse, FollowedChannel, Follower,
    GetChannelFollowersRequest, GetFollowedChannelsRequest, GetVipsRequest,
    ModifyChannelInfoRequest, Vip,
};
pub use chat::{
    Badge, ChatSettings, Chatter, ChattersResponse, Emote, GetChattersRequest,
    SendAnnouncementRequest, SendMessageRequest, SendMessageResponse, UpdateChatSettingsRequest,
    UserChatColor,
};
pub use clips::{Clip, CreatedClip, GetClipsRequest};
pub use eventsub::{
    Conduit, ConduitShard, CreateEventSubSubscriptionRequest, EventSubSubscription,
    EventSubSubscriptionsResponse, GetEventSubSubscriptionsRequest, ShardUpdate,
    TransportDescriptor,
};
pub use games::Game;
pub use goals::Goal;
pub use moderation::{
    AutoModSettings, BanUserRequest, BanUserResponse, BannedUser, BlockedTerm,
    GetBannedUsersRequest, GetBlockedTermsRequest, GetModeratorsRequest, GetUnbanRequestsRequest,
    ManageHeldAutoModMessageRequest, Moderator, ResolveUnbanRequestRequest, ShieldModeStatus,
    UnbanRequest, UpdateAutoModSettingsRequest,
};
pub use models::{DateRange, HelixResponse, Pagination};
pub use polls::{CreatePollRequest, GetPollsRequest, Poll, PollChoice};
pub use predictions::{
    CreatePredictionRequest, EndPredictionRequest, GetPredictionsRequest, Prediction,
    PredictionOutcome, Predictor,
};
pub use raids::Raid;
pub use search::{CategorySearchResult, ChannelSearchResult, SearchRequest};
pub use streams::{
    CreateStreamMarkerRequest, GetStreamMarkersRequest, GetStreamsRequest, Stream, StreamKey,
    StreamMarker, UserMarkers, VideoMarkers,
};
pub use subscriptions::{
    GetSubscriptionsRequest, Subscription, SubscriptionsResponse, UserSubscriptionResponse,
};
pub use teams::{Team, TeamMember};
pub use users::{GetUsersRequest, UpdateUserRequest, User, UserBlockTarget};
pub use videos::{GetVideosRequest, MutedSegment, Video};

use twitch_http::{Credentials, TwitchHttpClient};

use crate::eventsub::EventSubSession;

/// Helix API client.
///
/// Thin facade over the transport; resource methods live in the
/// per-resource files of this module. Cheap to clone.
#[derive(Clone)]
pub struct TwitchApi {
    http: TwitchHttpClient,
}

impl TwitchApi {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            http: TwitchHttpClient::new(credentials),
        }
    }

    /// Wrap a pre-configured transport.
    pub fn with_client(http: TwitchHttpClient) -> Self {
        Self { http }
    }

    /// Access the underlying transport.
    pub fn http(&self) -> &TwitchHttpClient {
        &self.http
    }

    /// Create an EventSub WebSocket session that registers its
    /// subscriptions through this client.
    pub fn eventsub_session(&self) -> EventSubSession<TwitchApi> {
        EventSubSession::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_exposes_the_transport_it_was_built_with() {
        let api = TwitchApi::new(Credentials::new("client-id", "user-token"));
        assert_eq!(api.http().client_id(), "client-id");

        let same = api.clone();
        assert_eq!(same.http().client_id(), "client-id");
    }
}
