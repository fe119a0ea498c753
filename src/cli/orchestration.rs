//! Main workflow orchestration logic
//!
//! Drives one tagging run over a [`Repository`] and a [`Prompt`]: collect
//! facts, plan, confirm, create the tag, confirm again, push. Each step is
//! recorded as a [`Stage`] so callers (and tests) can see how far a run got.

use chrono::NaiveDate;
use log::{debug, info};

use crate::domain::{SkipReason, TagListing, TagPlan, VersionTagPlanner};
use crate::error::{AutoTagError, Result};
use crate::git::{collect_facts, Repository};
use crate::ui::{self, Prompt};

/// States of a tagging run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CollectingFacts,
    DetectingStrategy,
    ComputingVersion,
    CheckingDuplicate,
    AwaitingConfirmation,
    Confirmed,
    TagCreated,
    AwaitingPushConfirmation,
    Skipped,
    Declined,
    Pushed,
    Deferred,
    /// Plan printed for `--dry-run`; nothing was created
    Previewed,
    Aborted,
}

impl Stage {
    /// Whether the run ends in this stage
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Stage::Skipped
                | Stage::Declined
                | Stage::Pushed
                | Stage::Deferred
                | Stage::Previewed
                | Stage::Aborted
        )
    }
}

/// How a run that did not abort ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Skipped(SkipReason),
    Declined,
    Pushed { tag: String, remote: String },
    /// Tag created locally, push left to the user
    Deferred { tag: String },
    /// Plan printed, nothing changed
    DryRun { tag: String },
}

/// Arguments for the tagging workflow
///
/// Mirrors the CLI Args but in a format suitable for orchestration logic.
/// This decoupling allows the workflow to be called programmatically
/// without depending on clap.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowArgs {
    /// Use this branch name instead of the checked-out one
    pub branch: Option<String>,

    /// Remote to push to
    pub remote: String,

    /// Preview mode - don't create tags or push
    pub dry_run: bool,

    /// Answer both prompts with yes
    pub assume_yes: bool,

    /// Never push; leave the tag local
    pub no_push: bool,

    /// Date stamped into pre-release suffixes
    pub date: NaiveDate,
}

impl WorkflowArgs {
    pub fn new(date: NaiveDate) -> Self {
        WorkflowArgs {
            branch: None,
            remote: "origin".to_string(),
            dry_run: false,
            assume_yes: false,
            no_push: false,
            date,
        }
    }
}

/// Result of a workflow run that did not abort
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// The branch that was planned for
    pub branch: String,

    /// The proposed (and possibly created) tag
    pub tag: String,

    pub outcome: Outcome,

    /// Every stage entered, in order
    pub stages: Vec<Stage>,
}

/// One tagging run
pub struct Workflow<'a> {
    planner: &'a VersionTagPlanner,
    args: WorkflowArgs,
    stages: Vec<Stage>,
}

impl<'a> Workflow<'a> {
    pub fn new(planner: &'a VersionTagPlanner, args: WorkflowArgs) -> Self {
        Workflow {
            planner,
            args,
            stages: Vec::new(),
        }
    }

    /// Stages entered so far, including `Aborted` after a failed run
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Run the workflow to a terminal stage.
    ///
    /// # Returns
    /// * `Ok(WorkflowResult)` - Skipped, declined, pushed, deferred or dry run
    /// * `Err` - The run was aborted; the last stage is `Aborted`
    pub fn run<R: Repository, P: Prompt>(
        &mut self,
        repo: &R,
        prompt: &mut P,
    ) -> Result<WorkflowResult> {
        match self.execute(repo, prompt) {
            Ok(result) => Ok(result),
            Err(e) => {
                self.enter(Stage::Aborted);
                Err(e)
            }
        }
    }

    fn enter(&mut self, stage: Stage) {
        debug!("stage: {:?}", stage);
        self.stages.push(stage);
    }

    fn confirm<P: Prompt>(&self, prompt: &mut P, question: &str) -> Result<bool> {
        if self.args.assume_yes {
            return Ok(true);
        }
        prompt.confirm(question)
    }

    fn finish(&mut self, plan: &TagPlan, stage: Stage, outcome: Outcome) -> WorkflowResult {
        self.enter(stage);
        WorkflowResult {
            branch: plan.context.branch.clone(),
            tag: plan.proposed_tag.clone(),
            outcome,
            stages: self.stages.clone(),
        }
    }

    fn execute<R: Repository, P: Prompt>(
        &mut self,
        repo: &R,
        prompt: &mut P,
    ) -> Result<WorkflowResult> {
        self.enter(Stage::CollectingFacts);
        let mut facts = collect_facts(repo)?;
        if let Some(branch) = &self.args.branch {
            facts.branch = branch.clone();
        }

        self.enter(Stage::DetectingStrategy);
        let context = self.planner.analyze(&facts);
        ui::display_plan_context(&context);
        for warning in &context.warnings {
            ui::display_boundary_warning(warning);
        }

        self.enter(Stage::ComputingVersion);
        let plan = match self.planner.plan_from(context, &facts, self.args.date) {
            Ok(plan) => plan,
            Err(e) => {
                if let AutoTagError::DirtyWorkingTree { changes } = &e {
                    ui::display_dirty_tree(changes);
                }
                return Err(e);
            }
        };

        self.enter(Stage::CheckingDuplicate);
        ui::display_proposed_tag(&plan);
        if let Some(reason) = plan.skip_reason {
            ui::display_skip(&plan);
            return Ok(self.finish(&plan, Stage::Skipped, Outcome::Skipped(reason)));
        }

        let tag = plan.proposed_tag.clone();
        if self.args.dry_run {
            ui::display_status(&format!("Dry run: would create tag {}", tag));
            return Ok(self.finish(&plan, Stage::Previewed, Outcome::DryRun { tag }));
        }

        self.enter(Stage::AwaitingConfirmation);
        if !self.confirm(prompt, &format!("Create tag {}?", tag))? {
            ui::display_status("Tag creation cancelled.");
            return Ok(self.finish(&plan, Stage::Declined, Outcome::Declined));
        }

        self.enter(Stage::Confirmed);
        repo.create_tag(&tag)?;
        ui::display_success(&format!("Created tag {}", tag));
        self.enter(Stage::TagCreated);

        let remote = self.args.remote.clone();
        if self.args.no_push {
            ui::display_manual_push_instruction(&tag, &remote);
            return Ok(self.finish(&plan, Stage::Deferred, Outcome::Deferred { tag }));
        }

        self.enter(Stage::AwaitingPushConfirmation);
        let question = format!("Tag '{}' created locally. Push to remote '{}'?", tag, remote);
        if !self.confirm(prompt, &question)? {
            ui::display_manual_push_instruction(&tag, &remote);
            return Ok(self.finish(&plan, Stage::Deferred, Outcome::Deferred { tag }));
        }

        repo.push_tag(&tag, &remote)?;
        ui::display_success(&format!("Pushed tag {} to {}", tag, remote));
        info!("run finished: {} pushed to {}", tag, remote);
        Ok(self.finish(&plan, Stage::Pushed, Outcome::Pushed { tag, remote }))
    }
}

/// Run the tagging workflow once
///
/// # Arguments
///
/// * `repo` - Repository to read facts from and tag
/// * `prompt` - Source of the two confirmations
/// * `planner` - Planner configured with the strategy table and bump override
/// * `args` - Workflow arguments (branch, remote, dry_run, ...)
pub fn run_workflow<R: Repository, P: Prompt>(
    repo: &R,
    prompt: &mut P,
    planner: &VersionTagPlanner,
    args: WorkflowArgs,
) -> Result<WorkflowResult> {
    Workflow::new(planner, args).run(repo, prompt)
}

/// Gather the tag listing; works on any checked-out commit
pub fn tag_listing<R: Repository>(repo: &R) -> Result<TagListing> {
    let facts = crate::domain::RepositoryFacts {
        tags: repo.list_tags()?,
        head_tags: repo.tags_pointing_at_head()?,
        ..Default::default()
    };
    Ok(TagListing::from_facts(&facts))
}
