//! Domain records and HTTP DTOs
//!
//! Domain records are assembled by the extraction layer from provider
//! payloads and never mutated afterwards. `requests` and `responses` hold
//! the bodies of the local JSON API.

pub mod game;
pub mod live;
pub mod odds;
pub mod player;
pub mod requests;
pub mod responses;
pub mod stats;
pub mod team;

pub use game::{
    Game, GameDetails, GameInfo, GameStatus, GameTeam, Score, SideStats, Situation, Spread,
    TeamGameStats,
};
pub use live::{LiveEvent, LivePrediction, LiveSnapshot};
pub use odds::{BettingData, LineMovement, Moneyline, PredictionInsights, SpreadLine, TotalLine};
pub use player::{Player, PlayerProfile};
pub use requests::{LineupSlotRequest, PlayersQuery, TeamsQuery};
pub use responses::{HealthResponse, LineupResponse, LiveStatusResponse, StatsResponse};
pub use stats::{
    stat_number, AtsTrend, BettingDefense, BettingOffense, BettingSplits, DefenseMetrics,
    OffenseMetrics, OverUnderTrend, OverallTrend, PassingLine, PassingProps, PlayerPropMetrics,
    PlayerStatLine, ReceivingLine, ReceivingProps, RushingLine, RushingProps, SituationalTrend,
    Stat, StatValue, TeamBettingStats, TeamPerformanceMetrics, TeamTrends,
};
pub use team::{Team, TeamOverview, TeamRecord};
