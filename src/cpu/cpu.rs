use crate::{
    bus::{Bus, MemoryMode},
    cpu::{
        addressing::resolve,
        decode::{MAX_INSTRUCTION_SIZE, decode},
        dispatch::{AddressingMode, Destination, DispatchEntry, Operation},
        flags::{FLAG_BREAK, FLAG_CARRY, FLAG_INTERRUPT_DISABLE, FLAG_NEGATIVE, Status},
        registers::RegisterFile,
    },
    error::{DecodeError, Error},
};

// APU registers cleared at power-on and reset.
pub const REG_SQ1_VOL: u16 = 0x4000;
pub const REG_NOISE_HI: u16 = 0x400F;
pub const REG_SND_CHN: u16 = 0x4015;
pub const REG_FRAME_COUNTER_CTL: u16 = 0x4017;

pub const NMI_VECTOR: u16 = 0xFFFA;
pub const RESET_VECTOR: u16 = 0xFFFC;
pub const IRQ_BRK_VECTOR: u16 = 0xFFFE;

/// Stack pointer after power-on.
pub const POWER_ON_SP: u8 = 0xFD;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Unpowered,
    Running,
    /// Stopped on an instruction that could not be decoded.
    Halted(DecodeError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    Continue,
    Halted(DecodeError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Halted(DecodeError),
    LimitReached,
}

/// The 2A03 execution engine. All memory traffic goes through `B`.
pub struct CPU<B: Bus> {
    pub(crate) regs: RegisterFile,
    pub(crate) bus: B,
    state: RunState,
    executed: u64,
}

impl<B: Bus> CPU<B> {
    pub fn new(bus: B) -> Self {
        Self {
            regs: RegisterFile::default(),
            bus,
            state: RunState::Unpowered,
            executed: 0,
        }
    }

    pub fn registers(&self) -> &RegisterFile {
        &self.regs
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn executed_instructions(&self) -> u64 {
        self.executed
    }

    /// Power on: configure the bus, initialise registers, silence the APU and
    /// load PC from the reset vector. The CPU is then ready to [`step`](Self::step).
    pub fn power_on(&mut self, mode: MemoryMode) -> Result<(), Error> {
        self.bus.power_on(mode)?;

        self.regs = RegisterFile {
            a: 0,
            x: 0,
            y: 0,
            s: POWER_ON_SP,
            pc: 0,
            p: Status(FLAG_INTERRUPT_DISABLE | FLAG_CARRY | FLAG_NEGATIVE),
        };

        self.bus.write(REG_FRAME_COUNTER_CTL, 0);
        self.bus.write(REG_SND_CHN, 0);
        for addr in REG_SQ1_VOL..=REG_NOISE_HI {
            self.bus.write(addr, 0);
        }

        self.regs.pc = self.read_word(RESET_VECTOR);
        self.state = RunState::Running;
        self.executed = 0;

        log::info!(
            "power on ({:?}), reset vector ${:04X}",
            mode,
            self.regs.pc
        );
        Ok(())
    }

    /// Warm reset. Registers other than S, P and PC are left alone.
    pub fn reset(&mut self) -> Result<(), Error> {
        if self.state == RunState::Unpowered {
            return Err(Error::NotPoweredOn);
        }

        self.regs.s = self.regs.s.wrapping_sub(3);
        self.regs.p.set_interrupt_disable(true);
        self.bus.write(REG_SND_CHN, 0);
        self.regs.pc = self.read_word(RESET_VECTOR);
        self.state = RunState::Running;

        log::info!("reset, PC=${:04X} SP=${:02X}", self.regs.pc, self.regs.s);
        Ok(())
    }

    /// Execute one instruction.
    pub fn step(&mut self) -> Result<StepResult, Error> {
        match self.state {
            RunState::Unpowered => return Err(Error::NotPoweredOn),
            RunState::Halted(err) => return Ok(StepResult::Halted(err)),
            RunState::Running => {}
        }

        let pc = self.regs.pc;
        let mut bytes = [0u8; MAX_INSTRUCTION_SIZE];
        // Fetches stop at the top of the address space rather than wrapping.
        let available = (0x1_0000 - pc as usize).min(MAX_INSTRUCTION_SIZE);
        for (i, byte) in bytes.iter_mut().take(available).enumerate() {
            *byte = self.bus.read(pc.wrapping_add(i as u16));
        }

        let desc = match decode(&bytes[..available]) {
            Ok(desc) => desc,
            Err(err) => return Ok(self.halt(err)),
        };
        if log::log_enabled!(log::Level::Trace) {
            self.trace(pc, &bytes[..desc.size as usize]);
        }

        self.execute(desc.entry, desc.operand, pc.wrapping_add(desc.size as u16));
        self.executed += 1;
        Ok(StepResult::Continue)
    }

    /// Step until the CPU halts or `limit` instructions have run.
    pub fn run(&mut self, limit: Option<u64>) -> Result<RunOutcome, Error> {
        let mut count = 0u64;
        loop {
            if limit.is_some_and(|limit| count >= limit) {
                return Ok(RunOutcome::LimitReached);
            }
            if let StepResult::Halted(err) = self.step()? {
                return Ok(RunOutcome::Halted(err));
            }
            count += 1;
        }
    }

    /// Non-maskable interrupt.
    pub fn nmi(&mut self) -> Result<(), Error> {
        self.interrupt(NMI_VECTOR)
    }

    /// Maskable interrupt. Returns false when IRQs are disabled.
    pub fn irq(&mut self) -> Result<bool, Error> {
        if self.regs.p.interrupt_disable() {
            return Ok(false);
        }
        self.interrupt(IRQ_BRK_VECTOR)?;
        Ok(true)
    }

    fn interrupt(&mut self, vector: u16) -> Result<(), Error> {
        if self.state == RunState::Unpowered {
            return Err(Error::NotPoweredOn);
        }

        self.push_word(self.regs.pc);
        self.push(self.regs.p.bits() & !FLAG_BREAK);
        self.regs.p.set_interrupt_disable(true);
        self.regs.pc = self.read_word(vector);
        Ok(())
    }

    fn halt(&mut self, err: DecodeError) -> StepResult {
        log::warn!("halted at ${:04X}: {}", self.regs.pc, err);
        self.state = RunState::Halted(err);
        StepResult::Halted(err)
    }

    fn trace(&self, pc: u16, bytes: &[u8]) {
        let raw = bytes
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(" ");
        log::trace!(
            "{:04X}  {:<8}  A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X}",
            pc,
            raw,
            self.regs.a,
            self.regs.x,
            self.regs.y,
            self.regs.p.bits(),
            self.regs.s
        );
    }

    fn execute(&mut self, entry: DispatchEntry, operand: u16, next_pc: u16) {
        let op = entry.operation;

        if entry.destination == Destination::ControlFlow {
            self.control_flow(op, entry.mode, operand, next_pc);
            return;
        }

        match entry.mode {
            AddressingMode::Implied => {
                self.operate(op, 0);
            }
            AddressingMode::Accumulator => {
                self.regs.a = self.operate(op, self.regs.a);
            }
            AddressingMode::Immediate => {
                self.operate(op, operand as u8);
            }
            mode => {
                let addr = resolve(mode, operand, &self.regs, &mut self.bus);
                let value = if op.reads_operand() {
                    self.bus.read(addr)
                } else {
                    0
                };
                let result = self.operate(op, value);
                if entry.destination == Destination::Memory {
                    self.bus.write(addr, result);
                }
            }
        }

        self.regs.pc = next_pc;
    }

    /// Apply a non-control-flow operation. The return value is what a
    /// memory-destination instruction writes back.
    fn operate(&mut self, op: Operation, value: u8) -> u8 {
        match op {
            Operation::Lda => {
                self.regs.a = value;
                self.regs.p.update_zero_and_negative(value);
                value
            }
            Operation::Ldx => {
                self.regs.x = value;
                self.regs.p.update_zero_and_negative(value);
                value
            }
            Operation::Ldy => {
                self.regs.y = value;
                self.regs.p.update_zero_and_negative(value);
                value
            }
            Operation::Lax => {
                self.regs.a = value;
                self.regs.x = value;
                self.regs.p.update_zero_and_negative(value);
                value
            }
            Operation::Sta => self.regs.a,
            Operation::Stx => self.regs.x,
            Operation::Sty => self.regs.y,
            Operation::Sax => self.regs.a & self.regs.x,

            Operation::Tax => self.transfer_to_x(self.regs.a),
            Operation::Tsx => self.transfer_to_x(self.regs.s),
            Operation::Tay => {
                self.regs.y = self.regs.a;
                self.regs.p.update_zero_and_negative(self.regs.y);
                self.regs.y
            }
            Operation::Txa => self.transfer_to_a(self.regs.x),
            Operation::Tya => self.transfer_to_a(self.regs.y),
            Operation::Txs => {
                self.regs.s = self.regs.x;
                self.regs.s
            }

            Operation::Pha => {
                self.push(self.regs.a);
                self.regs.a
            }
            Operation::Php => {
                let status = self.regs.p.bits() | FLAG_BREAK;
                self.push(status);
                status
            }
            Operation::Pla => {
                let value = self.pop();
                self.transfer_to_a(value)
            }
            Operation::Plp => {
                let value = self.pop();
                self.regs.p.restore(value);
                value
            }

            Operation::And => self.transfer_to_a(self.regs.a & value),
            Operation::Ora => self.transfer_to_a(self.regs.a | value),
            Operation::Eor => self.transfer_to_a(self.regs.a ^ value),
            Operation::Bit => {
                self.regs.p.set_zero(self.regs.a & value == 0);
                self.regs.p.set_overflow(value & 0x40 != 0);
                self.regs.p.set_negative(value & 0x80 != 0);
                value
            }
            Operation::Adc => {
                self.add_with_carry(value);
                self.regs.a
            }
            Operation::Sbc => {
                self.add_with_carry(!value);
                self.regs.a
            }
            Operation::Cmp => {
                self.compare(self.regs.a, value);
                value
            }
            Operation::Cpx => {
                self.compare(self.regs.x, value);
                value
            }
            Operation::Cpy => {
                self.compare(self.regs.y, value);
                value
            }

            Operation::Inc => {
                let result = value.wrapping_add(1);
                self.regs.p.update_zero_and_negative(result);
                result
            }
            Operation::Dec => {
                let result = value.wrapping_sub(1);
                self.regs.p.update_zero_and_negative(result);
                result
            }
            Operation::Inx => self.transfer_to_x(self.regs.x.wrapping_add(1)),
            Operation::Dex => self.transfer_to_x(self.regs.x.wrapping_sub(1)),
            Operation::Iny => {
                self.regs.y = self.regs.y.wrapping_add(1);
                self.regs.p.update_zero_and_negative(self.regs.y);
                self.regs.y
            }
            Operation::Dey => {
                self.regs.y = self.regs.y.wrapping_sub(1);
                self.regs.p.update_zero_and_negative(self.regs.y);
                self.regs.y
            }

            Operation::Asl => self.asl(value),
            Operation::Lsr => self.lsr(value),
            Operation::Rol => self.rol(value),
            Operation::Ror => self.ror(value),

            Operation::Slo => {
                let result = self.asl(value);
                self.transfer_to_a(self.regs.a | result);
                result
            }
            Operation::Rla => {
                let result = self.rol(value);
                self.transfer_to_a(self.regs.a & result);
                result
            }
            Operation::Sre => {
                let result = self.lsr(value);
                self.transfer_to_a(self.regs.a ^ result);
                result
            }
            Operation::Rra => {
                let result = self.ror(value);
                self.add_with_carry(result);
                result
            }
            Operation::Dcp => {
                let result = value.wrapping_sub(1);
                self.compare(self.regs.a, result);
                result
            }
            Operation::Isc => {
                let result = value.wrapping_add(1);
                self.add_with_carry(!result);
                result
            }

            Operation::Clc => self.set_flag(|p| p.set_carry(false)),
            Operation::Sec => self.set_flag(|p| p.set_carry(true)),
            Operation::Cli => self.set_flag(|p| p.set_interrupt_disable(false)),
            Operation::Sei => self.set_flag(|p| p.set_interrupt_disable(true)),
            Operation::Cld => self.set_flag(|p| p.set_decimal(false)),
            Operation::Sed => self.set_flag(|p| p.set_decimal(true)),
            Operation::Clv => self.set_flag(|p| p.set_overflow(false)),
            Operation::Nop => value,

            // Dispatched through `control_flow`.
            Operation::Jmp
            | Operation::Jsr
            | Operation::Rts
            | Operation::Rti
            | Operation::Brk
            | Operation::Bcc
            | Operation::Bcs
            | Operation::Beq
            | Operation::Bne
            | Operation::Bmi
            | Operation::Bpl
            | Operation::Bvc
            | Operation::Bvs => value,
        }
    }

    /// Operations that position PC themselves. `next_pc` is the address
    /// just past the instruction.
    fn control_flow(&mut self, op: Operation, mode: AddressingMode, operand: u16, next_pc: u16) {
        let p = self.regs.p;
        let target = match op {
            Operation::Jmp => resolve(mode, operand, &self.regs, &mut self.bus),
            Operation::Jsr => {
                // Return address is the JSR's last byte.
                self.push_word(next_pc.wrapping_sub(1));
                operand
            }
            Operation::Rts => self.pop_word().wrapping_add(1),
            Operation::Rti => {
                let status = self.pop();
                self.regs.p.restore(status);
                self.pop_word()
            }
            Operation::Brk => {
                self.regs.p.set_brk(true);
                self.regs.p.set_interrupt_disable(true);
                // Skip the padding byte after BRK.
                self.push_word(next_pc.wrapping_add(1));
                self.push(self.regs.p.bits());
                self.read_word(IRQ_BRK_VECTOR)
            }
            Operation::Bcc => branch(next_pc, operand, !p.carry()),
            Operation::Bcs => branch(next_pc, operand, p.carry()),
            Operation::Beq => branch(next_pc, operand, p.zero()),
            Operation::Bne => branch(next_pc, operand, !p.zero()),
            Operation::Bmi => branch(next_pc, operand, p.negative()),
            Operation::Bpl => branch(next_pc, operand, !p.negative()),
            Operation::Bvc => branch(next_pc, operand, !p.overflow()),
            Operation::Bvs => branch(next_pc, operand, p.overflow()),
            _ => next_pc,
        };

        self.regs.pc = target;
    }

    fn transfer_to_a(&mut self, value: u8) -> u8 {
        self.regs.a = value;
        self.regs.p.update_zero_and_negative(value);
        value
    }

    fn transfer_to_x(&mut self, value: u8) -> u8 {
        self.regs.x = value;
        self.regs.p.update_zero_and_negative(value);
        value
    }

    fn set_flag(&mut self, f: impl FnOnce(&mut Status)) -> u8 {
        f(&mut self.regs.p);
        self.regs.p.bits()
    }

    /// ADC core; SBC passes the inverted operand.
    fn add_with_carry(&mut self, value: u8) {
        let a = self.regs.a;
        let sum = a as u16 + value as u16 + self.regs.p.carry() as u16;
        let result = sum as u8;

        self.regs.p.set_carry(sum > 0xFF);
        self.regs.p.set_overflow((!(a ^ value) & (a ^ result)) & 0x80 != 0);
        self.transfer_to_a(result);
    }

    fn compare(&mut self, register: u8, value: u8) {
        self.regs.p.set_carry(register >= value);
        self.regs.p.set_zero(register == value);
        self.regs.p.set_negative(register.wrapping_sub(value) & 0x80 != 0);
    }

    fn asl(&mut self, value: u8) -> u8 {
        let result = value << 1;
        self.regs.p.set_carry(value & 0x80 != 0);
        self.regs.p.update_zero_and_negative(result);
        result
    }

    fn lsr(&mut self, value: u8) -> u8 {
        let result = value >> 1;
        self.regs.p.set_carry(value & 0x01 != 0);
        self.regs.p.update_zero_and_negative(result);
        result
    }

    fn rol(&mut self, value: u8) -> u8 {
        let result = (value << 1) | self.regs.p.carry() as u8;
        self.regs.p.set_carry(value & 0x80 != 0);
        self.regs.p.update_zero_and_negative(result);
        result
    }

    fn ror(&mut self, value: u8) -> u8 {
        let result = (value >> 1) | ((self.regs.p.carry() as u8) << 7);
        self.regs.p.set_carry(value & 0x01 != 0);
        self.regs.p.update_zero_and_negative(result);
        result
    }

    fn read_word(&mut self, addr: u16) -> u16 {
        let lo = self.bus.read(addr) as u16;
        let hi = self.bus.read(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    fn push(&mut self, value: u8) {
        let addr = self.regs.stack_addr();
        self.bus.write(addr, value);
        self.regs.s = self.regs.s.wrapping_sub(1);
    }

    fn pop(&mut self) -> u8 {
        self.regs.s = self.regs.s.wrapping_add(1);
        let addr = self.regs.stack_addr();
        self.bus.read(addr)
    }

    fn push_word(&mut self, value: u16) {
        self.push((value >> 8) as u8);
        self.push(value as u8);
    }

    fn pop_word(&mut self) -> u16 {
        let lo = self.pop() as u16;
        let hi = self.pop() as u16;
        (hi << 8) | lo
    }
}

/// Branch target: signed displacement from the following instruction when taken.
fn branch(next_pc: u16, operand: u16, taken: bool) -> u16 {
    if taken {
        next_pc.wrapping_add(operand as u8 as i8 as u16)
    } else {
        next_pc
    }
}
