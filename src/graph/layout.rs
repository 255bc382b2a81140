//! Physics tuning and the one-shot transition that applies it.

use force_graph::SimulationParameters;

/// Spring constant that yields `link_distance` of 30 at the default 0.05.
const SPRING_AT_UNIT_DISTANCE: f32 = 1.5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
	pub repulsion: f32,
	pub link_distance: f32,
	pub centering: f32,
	pub collision_radius: f32,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			repulsion: 150.0,
			link_distance: 30.0,
			centering: 0.02,
			collision_radius: 6.0,
		}
	}
}

impl LayoutConfig {
	pub fn resolve(&self) -> ForceSettings {
		ForceSettings {
			charge: self.repulsion.max(0.0),
			spring: SPRING_AT_UNIT_DISTANCE / self.link_distance.max(1.0),
			centering: self.centering.clamp(0.0, 1.0),
			collision_radius: self.collision_radius.max(0.0),
		}
	}
}

/// Tuning as the simulation consumes it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceSettings {
	pub charge: f32,
	pub spring: f32,
	pub centering: f32,
	pub collision_radius: f32,
}

impl ForceSettings {
	pub fn simulation_parameters(&self) -> SimulationParameters {
		SimulationParameters {
			force_charge: self.charge,
			force_spring: self.spring,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LayoutPhase {
	Unconfigured(LayoutConfig),
	Configured(ForceSettings),
}

impl LayoutPhase {
	pub fn new(config: LayoutConfig) -> Self {
		LayoutPhase::Unconfigured(config)
	}

	/// Returns the settings to install exactly once, on the first tick.
	pub fn on_tick(&mut self) -> Option<ForceSettings> {
		match *self {
			LayoutPhase::Unconfigured(config) => {
				let settings = config.resolve();
				*self = LayoutPhase::Configured(settings);
				Some(settings)
			}
			LayoutPhase::Configured(_) => None,
		}
	}

	pub fn settings(&self) -> Option<ForceSettings> {
		match self {
			LayoutPhase::Unconfigured(_) => None,
			LayoutPhase::Configured(settings) => Some(*settings),
		}
	}

	/// Parameters for a freshly built simulation.
	pub fn simulation_parameters(&self) -> SimulationParameters {
		match self {
			LayoutPhase::Unconfigured(_) => SimulationParameters::default(),
			LayoutPhase::Configured(settings) => settings.simulation_parameters(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn configures_on_first_tick_only() {
		let mut phase = LayoutPhase::new(LayoutConfig::default());
		assert!(phase.settings().is_none());

		let settings = phase.on_tick().unwrap();
		assert_eq!(phase.settings(), Some(settings));
		assert!(phase.on_tick().is_none());
		assert!(phase.on_tick().is_none());
	}

	#[test]
	fn default_distance_matches_stock_spring() {
		let settings = LayoutConfig::default().resolve();
		assert!((settings.spring - 0.05).abs() < 1e-6);
		assert_eq!(settings.charge, 150.0);
	}
}
