pub mod geocoding;
pub mod loop_orchestrator;
pub mod osrm;
pub mod waypoint_generator;
