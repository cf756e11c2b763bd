//! The think-act loop.

use lp_rules::{ActionVerifier, ConstraintChecker, TextGenerator};
use lp_world::{EpisodeLog, StepRecord, WorldState};

use crate::config::AgentConfig;
use crate::environment::{GameEnvironment, StepOutcome};
use crate::error::{AgentError, AgentResult};
use crate::prompt::{
    act_prompt, baseline_act_prompt, build_context, clean_candidate, think_prompt,
};
use crate::retry::{RetryPolicy, Selection, SelectionOutcome};

/// Observation substituted when the game answers with nothing.
pub const NO_RESPONSE: &str = "No response from game. Continuing...";

/// Longest error text carried into a substituted observation.
const ERROR_PREVIEW: usize = 100;

/// An agent that plays one episode at a time.
///
/// With constraints enforced, every generated action goes through the
/// [`RetryPolicy`]; otherwise the agent is a baseline that sends the cleaned
/// generator output as is.
pub struct Agent<G, E> {
    config: AgentConfig,
    generator: G,
    environment: Option<E>,
    world: WorldState,
    verifier: ActionVerifier,
    checker: ConstraintChecker,
    retry: RetryPolicy,
    observations: Vec<String>,
    actions: Vec<String>,
    thoughts: Vec<String>,
}

impl<G: TextGenerator, E: GameEnvironment> Agent<G, E> {
    /// Create an agent with no environment attached.
    pub fn new(generator: G, config: AgentConfig) -> AgentResult<Self> {
        let verifier = ActionVerifier::with_capacity(config.verifier_cache_capacity)?
            .with_generation(config.verify);
        Ok(Self {
            retry: RetryPolicy::from_config(&config),
            config,
            generator,
            environment: None,
            world: WorldState::new(),
            verifier,
            checker: ConstraintChecker::new(),
            observations: Vec::new(),
            actions: Vec::new(),
            thoughts: Vec::new(),
        })
    }

    /// Attach the game to play.
    pub fn with_environment(mut self, environment: E) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Replace the constraint checker.
    pub fn with_checker(mut self, checker: ConstraintChecker) -> Self {
        self.checker = checker;
        self
    }

    /// The belief state.
    pub fn world(&self) -> &WorldState {
        &self.world
    }

    /// The configuration in use.
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// The generator, e.g. to inspect a scripted one after a run.
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// The attached environment.
    pub fn environment(&self) -> Option<&E> {
        self.environment.as_ref()
    }

    /// Thoughts produced so far this episode.
    pub fn thoughts(&self) -> &[String] {
        &self.thoughts
    }

    /// Actions chosen so far this episode.
    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    /// Fold an observation into the belief state.
    pub fn observe(&mut self, observation: &str, action: &str) {
        self.world.update(observation, action);
    }

    /// Ask the generator for a short thought. Failure yields an empty thought.
    pub fn think(&mut self, observation: &str) -> String {
        let context = self.context();
        let prompt = think_prompt(&context, observation);
        let params = self.config.think;
        let thought = match self
            .generator
            .generate(&prompt, params.max_tokens, params.temperature)
        {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                log::warn!("thinking failed: {e}");
                String::new()
            }
        };
        self.thoughts.push(thought.clone());
        thought
    }

    /// Choose the next action given the observation and the thought.
    pub fn act(&mut self, observation: &str, thought: &str) -> Selection {
        let context = self.context();
        let fallback = self.config.fallback_action.clone();

        if !self.config.enforce_constraints {
            let prompt =
                baseline_act_prompt(&context, observation, thought, &self.world, &self.actions);
            let params = self.config.act;
            let raw = self
                .generator
                .generate(&prompt, params.max_tokens, params.temperature)
                .unwrap_or_else(|e| {
                    log::warn!("action generation failed: {e}");
                    String::new()
                });
            return Selection {
                action: clean_candidate(&raw, &fallback),
                attempts: 1,
                outcome: SelectionOutcome::Passed,
                rejections: Vec::new(),
                trace: Vec::new(),
            };
        }

        let constraints = self.checker.constraint_prompt_text(&self.world);
        let prompt = act_prompt(
            &context,
            observation,
            thought,
            &constraints,
            self.verifier.guidance_prompt(),
        );
        let valid = self.valid_action_hints();
        let invalid = self.invalid_action_hints();
        let raw = self
            .generator
            .generate_with_hints(&prompt, &valid, &invalid)
            .unwrap_or_else(|e| {
                log::warn!("action generation failed: {e}");
                String::new()
            });
        let candidate = clean_candidate(&raw, &fallback);
        self.retry.select(
            candidate,
            &mut self.verifier,
            &self.checker,
            &self.world,
            &mut self.generator,
        )
    }

    /// One think-then-act step. The action is remembered for later prompts.
    pub fn step(&mut self, observation: &str) -> (String, Selection) {
        let thought = self.think(observation);
        let selection = self.act(observation, &thought);
        self.observations.push(observation.to_string());
        self.actions.push(selection.action.clone());
        (thought, selection)
    }

    /// Actions worth suggesting in the current room.
    pub fn valid_action_hints(&self) -> Vec<String> {
        let mut hints: Vec<String> = self
            .world
            .exits()
            .into_iter()
            .take(3)
            .map(|exit| format!("go {}", exit.display_name().to_lowercase()))
            .collect();
        hints.extend(
            self.world
                .items_here()
                .into_iter()
                .take(2)
                .map(|item| format!("take {item}")),
        );
        if !self.world.pig_found() {
            hints.extend(["look", "examine", "search"].map(String::from));
        }
        hints
    }

    /// Actions to steer away from in the current room.
    pub fn invalid_action_hints(&self) -> Vec<String> {
        self.world
            .commands_tried_here()
            .into_iter()
            .take(5)
            .collect()
    }

    /// Play one episode of at most `max_turns` turns.
    ///
    /// The attached environment is closed and dropped at the end, so each
    /// episode needs a fresh one. Fails only when no environment is
    /// attached. Generator and environment failures during play are logged
    /// and replaced by fallbacks.
    pub fn run_episode(&mut self) -> AgentResult<EpisodeLog> {
        let Some(mut env) = self.environment.take() else {
            return Err(AgentError::MissingEnvironment);
        };

        self.world = WorldState::new();
        self.observations.clear();
        self.actions.clear();
        self.thoughts.clear();

        let intro = env.reset().unwrap_or_else(|e| {
            log::warn!("reset failed: {e}");
            String::new()
        });
        self.observe(&intro, "");
        let mut episode = EpisodeLog::new(intro.clone());
        log::info!("episode {} started", episode.id);

        let mut observation = intro;
        for turn in 1..=self.config.max_turns {
            let (thought, selection) = self.step(&observation);
            let action = selection.action.clone();
            log::info!(
                "turn {turn}: '{action}' ({} attempt(s){})",
                selection.attempts,
                match selection.outcome {
                    SelectionOutcome::Passed => "",
                    SelectionOutcome::Exhausted => ", unchecked",
                }
            );

            let outcome = play(&mut env, &action);
            self.observe(&outcome.observation, &action);

            let mut record = StepRecord::new(turn, action, outcome.observation.clone())
                .with_reward(outcome.reward)
                .with_attempts(selection.attempts);
            if !thought.is_empty() {
                record = record.with_thought(thought);
            }
            episode.push(record);
            if let Some(score) = outcome.score() {
                episode.final_score = Some(score);
            }
            if outcome.done {
                log::info!("game over after {turn} turn(s)");
                episode.finished = true;
                break;
            }
            observation = outcome.observation;
        }

        env.close();
        Ok(episode)
    }

    fn context(&self) -> String {
        build_context(
            &self.world,
            &self.observations,
            &self.actions,
            self.config.history_window,
        )
    }
}

/// Send one action, substituting an observation when the game fails.
fn play<E: GameEnvironment>(env: &mut E, action: &str) -> StepOutcome {
    match env.step(action) {
        Ok(outcome) if outcome.observation.trim().is_empty() => {
            log::warn!("no response from game for '{action}'");
            StepOutcome {
                observation: NO_RESPONSE.to_string(),
                ..outcome
            }
        }
        Ok(outcome) => outcome,
        Err(e) => {
            log::warn!("step '{action}' failed: {e}");
            let text: String = e.to_string().chars().take(ERROR_PREVIEW).collect();
            StepOutcome::new(format!("Error: {text}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use lp_rules::GeneratorError;
    use lp_world::Location;

    use super::*;
    use crate::error::EnvironmentError;
    use crate::scripted::{ScriptedGenerator, Transcript, TranscriptEnvironment};

    struct Broken;

    impl GameEnvironment for Broken {
        fn reset(&mut self) -> Result<String, EnvironmentError> {
            Err(EnvironmentError::StepFailed("interpreter missing".into()))
        }

        fn step(&mut self, _: &str) -> Result<StepOutcome, EnvironmentError> {
            Err(EnvironmentError::StepFailed("x".repeat(300)))
        }
    }

    struct Silent;

    impl GameEnvironment for Silent {
        fn reset(&mut self) -> Result<String, EnvironmentError> {
            Ok("Outside".into())
        }

        fn step(&mut self, _: &str) -> Result<StepOutcome, EnvironmentError> {
            Ok(StepOutcome::new("   "))
        }
    }

    struct Offline;

    impl TextGenerator for Offline {
        fn generate(&mut self, _: &str, _: u32, _: f32) -> Result<String, GeneratorError> {
            Err(GeneratorError::Unavailable("offline".into()))
        }
    }

    fn transcript() -> Transcript {
        Transcript::from_json_str(
            r#"{
                "intro": "Outside\nGrunk by farm. Pig run away into forest.",
                "turns": [
                    {"action": "ne", "observation": "Grunk fall in hole!\nHole"},
                    {"action": "look", "observation": "Fountain Room\nGrunk see pig here. [Grunk score go up one.]"}
                ]
            }"#,
        )
        .unwrap()
    }

    fn config() -> AgentConfig {
        AgentConfig::default().with_llm_verification(false)
    }

    #[test]
    fn missing_environment_is_fatal() {
        let mut agent: Agent<_, TranscriptEnvironment> =
            Agent::new(ScriptedGenerator::default(), config()).unwrap();
        assert!(matches!(agent.run_episode(), Err(AgentError::MissingEnvironment)));
    }

    #[test]
    fn episode_runs_to_transcript_end() {
        let generator = ScriptedGenerator::new(["head for the hole", "ne", "look around", "look"]);
        let mut agent = Agent::new(generator, config())
            .unwrap()
            .with_environment(TranscriptEnvironment::new(transcript()));
        let log = agent.run_episode().unwrap();

        assert_eq!(log.turns(), 2);
        assert!(log.finished);
        assert_eq!(log.final_score, Some(1.0));
        assert_eq!(log.actions().collect::<Vec<_>>(), vec!["go ne", "look"]);
        assert_eq!(log.steps[0].thought.as_deref(), Some("head for the hole"));
        assert_eq!(agent.world().player_location(), Some(Location::FountainRoom));
        assert!(agent.world().pig_found());
    }

    #[test]
    fn environment_is_spent_after_an_episode() {
        let mut agent = Agent::new(ScriptedGenerator::new(["look"]), config())
            .unwrap()
            .with_environment(TranscriptEnvironment::new(transcript()));
        agent.run_episode().unwrap();

        assert!(agent.environment().is_none());
        assert!(matches!(agent.run_episode(), Err(AgentError::MissingEnvironment)));
    }

    #[test]
    fn hard_violation_is_regenerated() {
        let mut agent: Agent<_, TranscriptEnvironment> = Agent::new(
            ScriptedGenerator::new(["think", "use orb", "look"]),
            config(),
        )
        .unwrap();
        agent.observe("Fountain Room", "");
        let (_, selection) = agent.step("Fountain Room");
        assert_eq!(selection.action, "look");
        assert_eq!(selection.attempts, 2);
        assert!(selection.rejections[0].contains("not in inventory"));
    }

    #[test]
    fn baseline_skips_checks() {
        let mut agent: Agent<_, TranscriptEnvironment> = Agent::new(
            ScriptedGenerator::new(["think", "\"use orb\""]),
            config().with_constraints(false),
        )
        .unwrap();
        let (_, selection) = agent.step("Outside");
        assert_eq!(selection.action, "use orb");
        assert!(selection.rejections.is_empty());
    }

    #[test]
    fn offline_generator_falls_back() {
        let mut agent: Agent<_, TranscriptEnvironment> = Agent::new(Offline, config()).unwrap();
        let (thought, selection) = agent.step("Outside");
        assert!(thought.is_empty());
        assert_eq!(selection.action, "look");
    }

    #[test]
    fn environment_errors_become_observations() {
        let mut agent =
            Agent::new(Offline, config().with_max_turns(2)).unwrap().with_environment(Broken);
        let log = agent.run_episode().unwrap();
        assert_eq!(log.intro, "");
        assert_eq!(log.turns(), 2);
        let obs = &log.steps[0].observation;
        assert!(obs.starts_with("Error: step failed: "));
        assert_eq!(obs.chars().count(), "Error: ".len() + 100);
        assert!(!log.finished);
    }

    #[test]
    fn empty_observation_is_replaced() {
        let mut agent =
            Agent::new(Offline, config().with_max_turns(1)).unwrap().with_environment(Silent);
        let log = agent.run_episode().unwrap();
        assert_eq!(log.final_observation(), NO_RESPONSE);
    }

    #[test]
    fn hints_follow_the_room() {
        let mut agent: Agent<_, TranscriptEnvironment> =
            Agent::new(ScriptedGenerator::default(), config()).unwrap();
        agent.observe("Fountain Room", "look");
        let hints = agent.valid_action_hints();
        assert!(hints.contains(&"go hole".to_string()));
        assert!(hints.contains(&"take coin".to_string()));
        assert!(hints.contains(&"search".to_string()));
        assert_eq!(agent.invalid_action_hints(), vec!["look".to_string()]);
    }

    #[test]
    fn max_turns_bounds_episode() {
        let generator = ScriptedGenerator::new(["t", "look"]);
        let mut agent = Agent::new(generator, config().with_max_turns(1))
            .unwrap()
            .with_environment(TranscriptEnvironment::new(transcript()));
        let log = agent.run_episode().unwrap();
        assert_eq!(log.turns(), 1);
        assert!(!log.finished);
    }
}
