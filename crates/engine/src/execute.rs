//! Interpreter: instruction dispatch, jump resolution and cycle metering.

use slang_common::{Argument, Call, Instruction, Label, Op};
use tracing::{debug, trace};

use crate::context::ExecutionContext;
use crate::error::EngineError;
use crate::function::Function;
use crate::program::Registry;

/// Where control goes after an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Fallthrough,
    /// Jump taken. `EXIT` terminates and `EMPTY` falls through.
    Goto(Label),
}

/// Outcome of [`Function::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The instruction at `position` ran and cost `cycles`.
    Executed { position: usize, cycles: u64 },
    /// The function has terminated; nothing ran.
    Halted,
}

impl Function {
    /// Begins a run with `inputs` bound positionally to the declared inputs.
    pub fn start(&mut self, inputs: &[u64]) {
        let declared = self.inputs().to_vec();
        let in_use = self.variables_in_use();
        self.context.seed(&in_use, &declared, inputs);
    }

    /// Executes the instruction at the program counter.
    ///
    /// Running past the last instruction or jumping to `EXIT` halts. A jump
    /// to a label no instruction carries is an error and records nothing.
    pub fn step(&mut self, registry: &Registry) -> Result<Step, EngineError> {
        if self.context.is_halted() {
            return Ok(Step::Halted);
        }
        let position = self.context.pc();
        let Some(&id) = self.sequence.get(position) else {
            self.context.halt();
            return Ok(Step::Halted);
        };

        let instr = &self.arena.get(id).instruction;
        let (flow, cycles) = execute(instr, &mut self.context, registry)?;
        let next = match flow {
            Flow::Fallthrough | Flow::Goto(Label::Empty) => Some(position + 1),
            Flow::Goto(Label::Exit) => None,
            Flow::Goto(label) => Some(
                self.context
                    .resolve(label)
                    .ok_or(EngineError::UndefinedLabelJump { label, at: position })?,
            ),
        };
        trace!(function = self.name(), position, instr = %instr, cycles, "step");

        self.context.advance(position, next.unwrap_or(position + 1), cycles);
        if next.is_none() {
            self.context.halt();
        }
        Ok(Step::Executed { position, cycles })
    }

    /// Runs from the first instruction until termination and returns `y`.
    ///
    /// There is no step limit; callers that need one drive [`Function::step`]
    /// themselves.
    pub fn run(&mut self, inputs: &[u64], registry: &Registry) -> Result<u64, EngineError> {
        self.start(inputs);
        while let Step::Executed { .. } = self.step(registry)? {}
        debug!(
            function = self.name(),
            steps = self.history().len() - 1,
            cycles = self.cycles(),
            result = self.result(),
            "run complete"
        );
        Ok(self.result())
    }
}

/// Executes one instruction against `ctx`, returning the control flow and the
/// cycles charged. Composition instructions also charge every cycle their
/// callees spent.
pub fn execute(
    instr: &Instruction,
    ctx: &mut ExecutionContext,
    registry: &Registry,
) -> Result<(Flow, u64), EngineError> {
    let v = instr.variable;
    let jump_if = |cond: bool, target: Label| if cond { Flow::Goto(target) } else { Flow::Fallthrough };
    let mut extra = 0;

    let flow = match &instr.op {
        Op::Increase => {
            ctx.set(v, ctx.value(v).saturating_add(1));
            Flow::Fallthrough
        }
        Op::Decrease => {
            ctx.set(v, ctx.value(v).saturating_sub(1));
            Flow::Fallthrough
        }
        Op::JumpNotZero { target } => jump_if(ctx.value(v) != 0, *target),
        Op::Neutral => Flow::Fallthrough,
        Op::ZeroVariable => {
            ctx.set(v, 0);
            Flow::Fallthrough
        }
        Op::GotoLabel { target } => Flow::Goto(*target),
        Op::ConstantAssignment { constant } => {
            ctx.set(v, *constant);
            Flow::Fallthrough
        }
        Op::Assignment { source } => {
            ctx.set(v, ctx.value(*source));
            Flow::Fallthrough
        }
        Op::JumpZero { target } => jump_if(ctx.value(v) == 0, *target),
        Op::JumpEqualConstant { constant, target } => jump_if(ctx.value(v) == *constant, *target),
        Op::JumpEqualVariable { other, target } => jump_if(ctx.value(v) == ctx.value(*other), *target),
        Op::Quote { call } => {
            let (value, cycles) = invoke(call, ctx, registry)?;
            extra = cycles;
            ctx.set(v, value);
            Flow::Fallthrough
        }
        Op::JumpEqualFunction { call, target } => {
            let (value, cycles) = invoke(call, ctx, registry)?;
            extra = cycles;
            jump_if(ctx.value(v) == value, *target)
        }
    };

    Ok((flow, instr.kind().cycles() + extra))
}

/// Evaluates `call` in a fresh copy of the callee, arguments first.
/// Returns the callee's `y` and every cycle spent, nested calls included.
fn invoke(call: &Call, ctx: &ExecutionContext, registry: &Registry) -> Result<(u64, u64), EngineError> {
    let callee = registry
        .get(&call.function)
        .ok_or_else(|| EngineError::UnknownFunctionReference {
            name: call.function.clone(),
        })?;
    if callee.inputs().len() != call.arguments.len() {
        return Err(EngineError::ArgumentCountMismatch {
            function: call.function.clone(),
            expected: callee.inputs().len(),
            found: call.arguments.len(),
        });
    }

    let mut cycles = 0;
    let mut args = Vec::with_capacity(call.arguments.len());
    for arg in &call.arguments {
        match arg {
            Argument::Variable(var) => args.push(ctx.value(*var)),
            Argument::Call(inner) => {
                let (value, spent) = invoke(inner, ctx, registry)?;
                cycles += spent;
                args.push(value);
            }
        }
    }

    let mut instance = callee.clone();
    let result = instance.run(&args, registry)?;
    cycles += instance.cycles();
    Ok((result, cycles))
}
