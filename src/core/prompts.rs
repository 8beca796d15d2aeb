// src/core/prompts.rs — Mutation and comparison templates
//
// Mutation templates see `{{ prompt }}`; the comparison template sees
// `{{ first }}` (the candidate) and `{{ second }}` (the parent prompt).

use minijinja::{context, Environment, UndefinedBehavior, Value};

use crate::infra::config::TemplatesConfig;
use crate::infra::errors::EvolveError;

const DEPTH_PREAMBLE: &str = "I want you to act as a Prompt Rewriter.\n\
Your objective is to rewrite a given prompt into a more complex version to make it a bit harder \
for famous AI systems to handle.\n\
The rewritten prompt must be reasonable, understandable and answerable by humans.\n\
Do not omit any non-text parts such as tables or code in #The Given Prompt#.\n\
You SHOULD complicate the given prompt using the following method:\n";

const DEPTH_POSTAMBLE: &str = "\nTry your best not to make #The Rewritten Prompt# verbose; it may only add \
10 to 20 words to #The Given Prompt#.\n\
'#The Given Prompt#', '#The Rewritten Prompt#', 'given prompt' and 'rewritten prompt' must not \
appear in #The Rewritten Prompt#.\n\
Reply with the rewritten prompt only.\n\n\
#The Given Prompt#:\n{{ prompt }}\n\n#The Rewritten Prompt#:\n";

const DEPTH_METHODS: [&str; 4] = [
    "Add one more constraint or requirement to #The Given Prompt#.",
    "If #The Given Prompt# contains inquiries about certain issues, increase the depth and breadth \
of the inquiry.",
    "Replace a general concept with a more specific concept.",
    "If #The Given Prompt# can be solved with just a few simple thinking processes, rewrite it to \
explicitly request multiple-step reasoning.",
];

pub const BREADTH_TEMPLATE: &str = "I want you to act as a Prompt Creator.\n\
Your goal is to draw inspiration from #The Given Prompt# to create a brand new prompt.\n\
This new prompt should belong to the same domain as #The Given Prompt# but be even more rare.\n\
The length and complexity of #Created Prompt# should be similar to that of #The Given Prompt#.\n\
#Created Prompt# must be reasonable and must be understood and answered by humans.\n\
'#The Given Prompt#', '#Created Prompt#', 'given prompt' and 'created prompt' must not appear \
in #Created Prompt#.\n\
Reply with the created prompt only.\n\n\
#The Given Prompt#:\n{{ prompt }}\n\n#Created Prompt#:\n";

pub const EQUAL_TEMPLATE: &str = "Here are two instructions to an AI assistant. Do you think they are \
equal to each other, meeting the following requirements:\n\
1. They have the same constraints and requirements.\n\
2. They have the same depth and breadth of the inquiry.\n\n\
The First Prompt:\n{{ first }}\n\n\
The Second Prompt:\n{{ second }}\n\n\
Your Judgement (just answer Equal or Not Equal, no need to explain the reason):";

/// The built-in depth templates, one per complication method.
pub fn default_depth_templates() -> Vec<String> {
    DEPTH_METHODS
        .iter()
        .map(|method| format!("{DEPTH_PREAMBLE}{method}\n{DEPTH_POSTAMBLE}"))
        .collect()
}

const BREADTH: &str = "breadth";
const EQUAL: &str = "equal";

fn depth_name(index: usize) -> String {
    format!("depth[{index}]")
}

/// A validated set of K depth templates, one breadth template and one
/// comparison template, registered as `depth[i]`, `breadth` and `equal`.
#[derive(Debug)]
pub struct TemplateSet {
    env: Environment<'static>,
    depth: usize,
}

impl TemplateSet {
    /// Register every template and render it once with placeholder values,
    /// so syntax errors and unknown variables fail before any epoch runs.
    pub fn new(depth: Vec<String>, breadth: String, equal: String) -> Result<Self, EvolveError> {
        let mut env = environment();
        let count = depth.len();
        for (i, source) in depth.into_iter().enumerate() {
            register(&mut env, depth_name(i), source, context! { prompt => "" })?;
        }
        register(&mut env, BREADTH.into(), breadth, context! { prompt => "" })?;
        register(&mut env, EQUAL.into(), equal, context! { first => "", second => "" })?;

        Ok(Self { env, depth: count })
    }

    /// The built-in prompts.
    pub fn builtin() -> Result<Self, EvolveError> {
        Self::from_config(&TemplatesConfig::default())
    }

    /// Built-in templates, with any configured overrides applied.
    pub fn from_config(config: &TemplatesConfig) -> Result<Self, EvolveError> {
        let depth = config
            .depth
            .clone()
            .unwrap_or_else(default_depth_templates);
        let breadth = config
            .breadth
            .clone()
            .unwrap_or_else(|| BREADTH_TEMPLATE.to_string());
        let equal = config
            .equal
            .clone()
            .unwrap_or_else(|| EQUAL_TEMPLATE.to_string());
        Self::new(depth, breadth, equal)
    }

    pub fn depth_count(&self) -> usize {
        self.depth
    }

    pub fn render_depth(&self, index: usize, prompt: &str) -> Result<String, EvolveError> {
        if index >= self.depth {
            return Err(EvolveError::Template {
                name: depth_name(index),
                message: format!("only {} depth templates configured", self.depth),
            });
        }
        self.render(&depth_name(index), context! { prompt => prompt })
    }

    pub fn render_breadth(&self, prompt: &str) -> Result<String, EvolveError> {
        self.render(BREADTH, context! { prompt => prompt })
    }

    pub fn render_equal(&self, first: &str, second: &str) -> Result<String, EvolveError> {
        self.render(EQUAL, context! { first => first, second => second })
    }

    fn render(&self, name: &str, ctx: Value) -> Result<String, EvolveError> {
        Ok(self.env.get_template(name)?.render(ctx)?)
    }
}

fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_keep_trailing_newline(true);
    env
}

fn register(
    env: &mut Environment<'static>,
    name: String,
    source: String,
    sample: Value,
) -> Result<(), EvolveError> {
    let invalid = |e: minijinja::Error| EvolveError::Template {
        name: name.clone(),
        message: e.to_string(),
    };
    env.add_template_owned(name.clone(), source)
        .map_err(invalid)?;
    env.get_template(&name)
        .and_then(|t| t.render(sample))
        .map(|_| ())
        .map_err(invalid)
}
