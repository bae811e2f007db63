use crate::{
    bus::{Bus, MemoryMode},
    cpu::{
        cpu::{CPU, RunOutcome, RunState, StepResult},
        flags::{FLAG_BREAK, FLAG_CARRY, FLAG_INTERRUPT_DISABLE, FLAG_NEGATIVE, FLAG_UNUSED},
    },
    error::{DecodeError, Error},
};

struct TestBus {
    mem: [u8; 65536],
}

impl TestBus {
    /// Flat memory with the reset vector pointing at $8000.
    fn new() -> Self {
        let mut mem = [0; 65536];
        mem[0xFFFC] = 0x00;
        mem[0xFFFD] = 0x80;
        Self { mem }
    }

    fn load(&mut self, addr: u16, program: &[u8]) {
        let start = addr as usize;
        self.mem[start..start + program.len()].copy_from_slice(program);
    }
}

impl Bus for TestBus {
    fn read(&mut self, addr: u16) -> u8 {
        self.mem[addr as usize]
    }

    fn write(&mut self, addr: u16, data: u8) {
        self.mem[addr as usize] = data;
    }
}

fn powered_cpu(bus: TestBus) -> CPU<TestBus> {
    let mut cpu = CPU::new(bus);
    cpu.power_on(MemoryMode::Nrom256).unwrap();
    cpu
}

fn run_program(program: &[u8], steps: usize) -> CPU<TestBus> {
    let mut bus = TestBus::new();
    bus.load(0x8000, program);
    let mut cpu = powered_cpu(bus);
    for _ in 0..steps {
        assert_eq!(cpu.step().unwrap(), StepResult::Continue);
    }
    cpu
}

#[test]
fn power_on_initial_state() {
    let mut bus = TestBus::new();
    bus.mem[0x4000..=0x4017].fill(0xAA);
    let cpu = powered_cpu(bus);

    let regs = cpu.registers();
    assert_eq!(regs.pc, 0x8000);
    assert_eq!(regs.s, 0xFD);
    assert_eq!((regs.a, regs.x, regs.y), (0, 0, 0));
    assert_eq!(
        regs.p.bits(),
        FLAG_INTERRUPT_DISABLE | FLAG_CARRY | FLAG_NEGATIVE
    );
    assert_eq!(cpu.state(), RunState::Running);

    assert!(cpu.bus.mem[0x4000..=0x400F].iter().all(|&b| b == 0));
    assert_eq!(cpu.bus.mem[0x4015], 0);
    assert_eq!(cpu.bus.mem[0x4017], 0);
    assert_eq!(cpu.bus.mem[0x4010], 0xAA);
}

#[test]
fn step_before_power_on_fails() {
    let mut cpu = CPU::new(TestBus::new());
    assert!(matches!(cpu.step(), Err(Error::NotPoweredOn)));
    assert!(matches!(cpu.reset(), Err(Error::NotPoweredOn)));
    assert!(matches!(cpu.run(None), Err(Error::NotPoweredOn)));
    assert_eq!(cpu.state(), RunState::Unpowered);
}

#[test]
fn reset_drops_stack_and_disables_irq() {
    let mut cpu = run_program(&[0x58], 1); // CLI
    assert!(!cpu.registers().p.interrupt_disable());
    cpu.bus.mem[0x4015] = 0x1F;

    cpu.reset().unwrap();

    assert_eq!(cpu.registers().s, 0xFA);
    assert!(cpu.registers().p.interrupt_disable());
    assert_eq!(cpu.registers().pc, 0x8000);
    assert_eq!(cpu.bus.mem[0x4015], 0);
}

#[test]
fn lda_immediate_loads_value() {
    let cpu = run_program(&[0xA9, 0x42], 1); // LDA #$42
    assert_eq!(cpu.registers().a, 0x42);
    assert_eq!(cpu.registers().pc, 0x8002);
}

#[test]
fn lda_sets_zero_flag() {
    let cpu = run_program(&[0xA9, 0x00], 1); // LDA #$00
    assert!(cpu.registers().p.zero());
    assert!(!cpu.registers().p.negative());
}

#[test]
fn lda_sets_negative_flag() {
    let cpu = run_program(&[0xA9, 0x80], 1); // LDA #$80
    assert!(cpu.registers().p.negative());
}

#[test]
fn lda_indirect_indexed_uses_full_pointer() {
    let mut bus = TestBus::new();
    bus.load(0x8000, &[0xA0, 0x10, 0xB1, 0x86]); // LDY #$10; LDA ($86),Y
    bus.mem[0x0086] = 0x28;
    bus.mem[0x0087] = 0x40;
    bus.mem[0x4038] = 0x5A;

    let mut cpu = powered_cpu(bus);
    cpu.step().unwrap();
    cpu.step().unwrap();

    assert_eq!(cpu.registers().a, 0x5A);
}

#[test]
fn tax_transfers_a_to_x() {
    let cpu = run_program(&[0xA9, 0x10, 0xAA], 2); // LDA #$10; TAX
    assert_eq!(cpu.registers().x, 0x10);
}

#[test]
fn txs_does_not_touch_flags() {
    let cpu = run_program(&[0xA2, 0x00, 0xA9, 0x01, 0x9A], 3); // LDX #0; LDA #1; TXS
    assert_eq!(cpu.registers().s, 0x00);
    assert!(!cpu.registers().p.zero());
}

#[test]
fn sta_writes_to_memory() {
    // LDA #$33; STA $0200
    let cpu = run_program(&[0xA9, 0x33, 0x8D, 0x00, 0x02], 2);
    assert_eq!(cpu.bus.mem[0x0200], 0x33);
    assert_eq!(cpu.registers().pc, 0x8005);
}

#[test]
fn jmp_changes_program_counter() {
    let mut bus = TestBus::new();
    bus.load(0x8000, &[0x4C, 0x00, 0x90]); // JMP $9000
    bus.load(0x9000, &[0xA9, 0x55]); // LDA #$55

    let mut cpu = powered_cpu(bus);
    cpu.step().unwrap();
    assert_eq!(cpu.registers().pc, 0x9000);
    cpu.step().unwrap();

    assert_eq!(cpu.registers().a, 0x55);
}

#[test]
fn jmp_indirect_page_boundary_bug() {
    let mut bus = TestBus::new();
    bus.load(0x8000, &[0x6C, 0xFF, 0x30]); // JMP ($30FF)
    bus.mem[0x30FF] = 0x80;
    bus.mem[0x3000] = 0x50;
    bus.mem[0x3100] = 0x40;

    let mut cpu = powered_cpu(bus);
    cpu.step().unwrap();

    assert_eq!(cpu.registers().pc, 0x5080);
}

#[test]
fn inx_increments_x() {
    let cpu = run_program(&[0xA2, 0x01, 0xE8], 2); // LDX #$01; INX
    assert_eq!(cpu.registers().x, 0x02);
}

#[test]
fn dex_sets_zero_flag() {
    let cpu = run_program(&[0xA2, 0x01, 0xCA], 2); // LDX #$01; DEX
    assert!(cpu.registers().p.zero());
}

#[test]
fn inc_memory_wraps() {
    let mut bus = TestBus::new();
    bus.load(0x8000, &[0xE6, 0x10]); // INC $10
    bus.mem[0x0010] = 0xFF;

    let mut cpu = powered_cpu(bus);
    cpu.step().unwrap();

    assert_eq!(cpu.bus.mem[0x0010], 0x00);
    assert!(cpu.registers().p.zero());
}

#[test]
fn adc_carry_out_to_zero() {
    // LDA #$01; CLC; ADC #$FF
    let cpu = run_program(&[0xA9, 0x01, 0x18, 0x69, 0xFF], 3);
    let p = cpu.registers().p;
    assert_eq!(cpu.registers().a, 0x00);
    assert!(p.carry());
    assert!(p.zero());
    assert!(!p.overflow());
    assert!(!p.negative());
}

#[test]
fn adc_signed_overflow() {
    // LDA #$50; CLC; ADC #$50
    let cpu = run_program(&[0xA9, 0x50, 0x18, 0x69, 0x50], 3);
    let p = cpu.registers().p;
    assert_eq!(cpu.registers().a, 0xA0);
    assert!(p.overflow());
    assert!(p.negative());
    assert!(!p.carry());
}

#[test]
fn adc_adds_incoming_carry() {
    // LDA #$10; SEC; ADC #$01
    let cpu = run_program(&[0xA9, 0x10, 0x38, 0x69, 0x01], 3);
    assert_eq!(cpu.registers().a, 0x12);
    assert!(!cpu.registers().p.carry());
}

#[test]
fn sbc_borrows_when_operand_larger() {
    // LDA #$50; SEC; SBC #$F0
    let cpu = run_program(&[0xA9, 0x50, 0x38, 0xE9, 0xF0], 3);
    let p = cpu.registers().p;
    assert_eq!(cpu.registers().a, 0x60);
    assert!(!p.carry());
    assert!(!p.overflow());
    assert!(!p.zero());
    assert!(!p.negative());
}

#[test]
fn sbc_without_borrow() {
    // LDA #$50; SEC; SBC #$30
    let cpu = run_program(&[0xA9, 0x50, 0x38, 0xE9, 0x30], 3);
    assert_eq!(cpu.registers().a, 0x20);
    assert!(cpu.registers().p.carry());
}

#[test]
fn sbc_signed_overflow() {
    // LDA #$80; SEC; SBC #$01  (-128 - 1)
    let cpu = run_program(&[0xA9, 0x80, 0x38, 0xE9, 0x01], 3);
    assert_eq!(cpu.registers().a, 0x7F);
    assert!(cpu.registers().p.overflow());
    assert!(cpu.registers().p.carry());
}

#[test]
fn cmp_sets_carry_zero_negative() {
    // LDA #$40; CMP #$40
    let cpu = run_program(&[0xA9, 0x40, 0xC9, 0x40], 2);
    let p = cpu.registers().p;
    assert!(p.carry() && p.zero() && !p.negative());

    // LDA #$10; CMP #$20
    let cpu = run_program(&[0xA9, 0x10, 0xC9, 0x20], 2);
    let p = cpu.registers().p;
    assert!(!p.carry() && !p.zero() && p.negative());
}

#[test]
fn cpx_and_cpy_compare_index_registers() {
    // LDX #$05; CPX #$03
    let cpu = run_program(&[0xA2, 0x05, 0xE0, 0x03], 2);
    assert!(cpu.registers().p.carry());
    assert!(!cpu.registers().p.zero());

    // LDY #$03; CPY #$03
    let cpu = run_program(&[0xA0, 0x03, 0xC0, 0x03], 2);
    assert!(cpu.registers().p.zero());
}

#[test]
fn asl_accumulator_shifts_out_carry() {
    let cpu = run_program(&[0xA9, 0x81, 0x0A], 2); // LDA #$81; ASL A
    assert_eq!(cpu.registers().a, 0x02);
    assert!(cpu.registers().p.carry());
}

#[test]
fn lsr_memory_writes_back() {
    let mut bus = TestBus::new();
    bus.load(0x8000, &[0x4E, 0x34, 0x12]); // LSR $1234
    bus.mem[0x1234] = 0x03;

    let mut cpu = powered_cpu(bus);
    cpu.step().unwrap();

    assert_eq!(cpu.bus.mem[0x1234], 0x01);
    assert!(cpu.registers().p.carry());
    assert!(!cpu.registers().p.negative());
}

#[test]
fn rol_and_ror_rotate_through_carry() {
    // SEC; LDA #$80; ROL A
    let cpu = run_program(&[0x38, 0xA9, 0x80, 0x2A], 3);
    assert_eq!(cpu.registers().a, 0x01);
    assert!(cpu.registers().p.carry());

    // SEC; LDA #$02; ROR A
    let cpu = run_program(&[0x38, 0xA9, 0x02, 0x6A], 3);
    assert_eq!(cpu.registers().a, 0x81);
    assert!(!cpu.registers().p.carry());
    assert!(cpu.registers().p.negative());
}

#[test]
fn bit_copies_high_bits() {
    let mut bus = TestBus::new();
    bus.load(0x8000, &[0xA9, 0x01, 0x24, 0x10]); // LDA #$01; BIT $10
    bus.mem[0x0010] = 0xC0;

    let mut cpu = powered_cpu(bus);
    cpu.step().unwrap();
    cpu.step().unwrap();

    let p = cpu.registers().p;
    assert!(p.zero() && p.overflow() && p.negative());
}

#[test]
fn bne_loops_until_zero() {
    // LDX #3; DEX; BNE -3
    let cpu = run_program(&[0xA2, 0x03, 0xCA, 0xD0, 0xFD], 7);
    assert_eq!(cpu.registers().x, 0x00);
    assert_eq!(cpu.registers().pc, 0x8005);
}

#[test]
fn bne_back_two_is_a_tight_loop() {
    // LDX #1; BNE -2
    let mut cpu = run_program(&[0xA2, 0x01, 0xD0, 0xFE], 2);
    assert_eq!(cpu.registers().pc, 0x8002);
    cpu.step().unwrap();
    assert_eq!(cpu.registers().pc, 0x8002);
}

#[test]
fn branch_not_taken_advances_past_instruction() {
    // LDX #1; BEQ +16
    let cpu = run_program(&[0xA2, 0x01, 0xF0, 0x10], 2);
    assert_eq!(cpu.registers().pc, 0x8004);
}

#[test]
fn branch_forward_when_taken() {
    // BCS +4 (carry is set at power-on)
    let cpu = run_program(&[0xB0, 0x04], 1);
    assert_eq!(cpu.registers().pc, 0x8006);
}

#[test]
fn jsr_and_rts_work() {
    let mut bus = TestBus::new();
    bus.load(0x8000, &[0x20, 0x00, 0x90, 0xA9, 0x11]); // JSR $9000; LDA #$11
    bus.load(0x9000, &[0xA9, 0x22, 0x60]); // LDA #$22; RTS

    let mut cpu = powered_cpu(bus);
    cpu.step().unwrap(); // JSR
    cpu.step().unwrap(); // LDA #$22
    cpu.step().unwrap(); // RTS
    cpu.step().unwrap(); // LDA #$11

    assert_eq!(cpu.registers().a, 0x11);
}

#[test]
fn jsr_pushes_last_byte_address_on_page_one() {
    let mut bus = TestBus::new();
    bus.load(0x8000, &[0x20, 0x34, 0x12]); // JSR $1234
    bus.load(0x1234, &[0x60]); // RTS

    let mut cpu = powered_cpu(bus);
    cpu.step().unwrap();
    assert_eq!(cpu.registers().pc, 0x1234);
    assert_eq!(cpu.registers().s, 0xFB);
    assert_eq!(cpu.bus.mem[0x01FD], 0x80);
    assert_eq!(cpu.bus.mem[0x01FC], 0x02);

    cpu.step().unwrap();
    assert_eq!(cpu.registers().pc, 0x8003);
    assert_eq!(cpu.registers().s, 0xFD);
}

#[test]
fn pha_pla_round_trip_through_stack_page() {
    // LDA #$7E; PHA; LDA #$00; PLA
    let cpu = run_program(&[0xA9, 0x7E, 0x48, 0xA9, 0x00, 0x68], 4);
    assert_eq!(cpu.bus.mem[0x01FD], 0x7E);
    assert_eq!(cpu.registers().a, 0x7E);
    assert_eq!(cpu.registers().s, 0xFD);
}

#[test]
fn php_pushes_break_without_keeping_it() {
    let cpu = run_program(&[0x08], 1); // PHP
    let pushed = cpu.bus.mem[0x01FD];
    assert_eq!(pushed & FLAG_BREAK, FLAG_BREAK);
    assert_eq!(pushed & !FLAG_BREAK, cpu.registers().p.bits());
    assert!(!cpu.registers().p.brk());
}

#[test]
fn plp_preserves_break_and_unused() {
    // LDA #$FF; PHA; PLP
    let cpu = run_program(&[0xA9, 0xFF, 0x48, 0x28], 3);
    assert_eq!(cpu.registers().p.bits(), 0xFF & !(FLAG_BREAK | FLAG_UNUSED));
}

#[test]
fn brk_jumps_to_irq_vector() {
    let mut bus = TestBus::new();
    bus.load(0x8000, &[0x00]); // BRK
    bus.mem[0xFFFE] = 0x00;
    bus.mem[0xFFFF] = 0x90;

    let mut cpu = powered_cpu(bus);
    let before = cpu.registers().p.bits();
    cpu.step().unwrap();

    assert_eq!(cpu.registers().pc, 0x9000);
    assert!(cpu.registers().p.interrupt_disable());
    assert!(cpu.registers().p.brk());
    // Return address skips the padding byte.
    assert_eq!(cpu.bus.mem[0x01FD], 0x80);
    assert_eq!(cpu.bus.mem[0x01FC], 0x02);
    assert_eq!(cpu.bus.mem[0x01FB], before | FLAG_BREAK);
}

#[test]
fn brk_pushes_status_with_interrupt_disable_set() {
    let mut bus = TestBus::new();
    bus.load(0x8000, &[0x58, 0x00]); // CLI; BRK
    bus.mem[0xFFFE] = 0x00;
    bus.mem[0xFFFF] = 0x90;

    let mut cpu = powered_cpu(bus);
    cpu.step().unwrap();
    assert!(!cpu.registers().p.interrupt_disable());
    cpu.step().unwrap();

    let pushed = cpu.bus.mem[0x01FB];
    assert_eq!(pushed & FLAG_INTERRUPT_DISABLE, FLAG_INTERRUPT_DISABLE);
    assert_eq!(
        pushed,
        FLAG_NEGATIVE | FLAG_BREAK | FLAG_INTERRUPT_DISABLE | FLAG_CARRY
    );
    assert_eq!(cpu.registers().pc, 0x9000);
}

#[test]
fn rti_restores_status_and_pc() {
    let mut bus = TestBus::new();
    bus.load(0x8000, &[0x00, 0xEA, 0xEA]); // BRK; padding; NOP
    bus.load(0x9000, &[0x18, 0x40]); // CLC; RTI
    bus.mem[0xFFFE] = 0x00;
    bus.mem[0xFFFF] = 0x90;

    let mut cpu = powered_cpu(bus);
    cpu.step().unwrap(); // BRK
    cpu.step().unwrap(); // CLC
    cpu.step().unwrap(); // RTI

    assert_eq!(cpu.registers().pc, 0x8002);
    assert!(cpu.registers().p.carry());
    assert_eq!(cpu.registers().s, 0xFD);
}

#[test]
fn nmi_pushes_state_and_jumps() {
    let mut bus = TestBus::new();
    bus.mem[0xFFFA] = 0x00;
    bus.mem[0xFFFB] = 0xC0;

    let mut cpu = powered_cpu(bus);
    cpu.nmi().unwrap();

    assert_eq!(cpu.registers().pc, 0xC000);
    assert_eq!(cpu.bus.mem[0x01FD], 0x80);
    assert_eq!(cpu.bus.mem[0x01FC], 0x00);
    assert_eq!(cpu.bus.mem[0x01FB] & FLAG_BREAK, 0);
}

#[test]
fn irq_respects_interrupt_disable() {
    let mut bus = TestBus::new();
    bus.load(0x8000, &[0x58]); // CLI
    bus.mem[0xFFFE] = 0x00;
    bus.mem[0xFFFF] = 0xA0;

    let mut cpu = powered_cpu(bus);
    assert!(!cpu.irq().unwrap());
    assert_eq!(cpu.registers().pc, 0x8000);

    cpu.step().unwrap();
    assert!(cpu.irq().unwrap());
    assert_eq!(cpu.registers().pc, 0xA000);
    assert!(cpu.registers().p.interrupt_disable());
}

#[test]
fn lax_loads_a_and_x() {
    let mut bus = TestBus::new();
    bus.load(0x8000, &[0xA7, 0x20]); // LAX $20
    bus.mem[0x0020] = 0x9C;

    let mut cpu = powered_cpu(bus);
    cpu.step().unwrap();

    assert_eq!(cpu.registers().a, 0x9C);
    assert_eq!(cpu.registers().x, 0x9C);
    assert!(cpu.registers().p.negative());
}

#[test]
fn dcp_decrements_then_compares() {
    let mut bus = TestBus::new();
    bus.load(0x8000, &[0xA9, 0x41, 0xC7, 0x20]); // LDA #$41; DCP $20
    bus.mem[0x0020] = 0x42;

    let mut cpu = powered_cpu(bus);
    cpu.step().unwrap();
    cpu.step().unwrap();

    assert_eq!(cpu.bus.mem[0x0020], 0x41);
    assert!(cpu.registers().p.zero());
    assert!(cpu.registers().p.carry());
}

fn run_with_zero_page(program: &[u8], value: u8, steps: usize) -> CPU<TestBus> {
    let mut bus = TestBus::new();
    bus.load(0x8000, program);
    bus.mem[0x0020] = value;

    let mut cpu = powered_cpu(bus);
    for _ in 0..steps {
        assert_eq!(cpu.step().unwrap(), StepResult::Continue);
    }
    cpu
}

#[test]
fn slo_shifts_then_ors() {
    // CLC; LDA #$01; SLO $20
    let cpu = run_with_zero_page(&[0x18, 0xA9, 0x01, 0x07, 0x20], 0x81, 3);
    assert_eq!(cpu.bus.mem[0x0020], 0x02);
    assert_eq!(cpu.registers().a, 0x03);
    assert!(cpu.registers().p.carry());
}

#[test]
fn rla_rotates_then_ands() {
    // CLC; LDA #$03; RLA $20
    let cpu = run_with_zero_page(&[0x18, 0xA9, 0x03, 0x27, 0x20], 0x81, 3);
    assert_eq!(cpu.bus.mem[0x0020], 0x02);
    assert_eq!(cpu.registers().a, 0x02);
    assert!(cpu.registers().p.carry());
}

#[test]
fn sre_shifts_then_eors() {
    // CLC; LDA #$FF; SRE $20
    let cpu = run_with_zero_page(&[0x18, 0xA9, 0xFF, 0x47, 0x20], 0x03, 3);
    assert_eq!(cpu.bus.mem[0x0020], 0x01);
    assert_eq!(cpu.registers().a, 0xFE);
    assert!(cpu.registers().p.carry());
    assert!(cpu.registers().p.negative());
}

#[test]
fn rra_rotates_then_adds_with_new_carry() {
    // SEC; LDA #$10; RRA $20
    let cpu = run_with_zero_page(&[0x38, 0xA9, 0x10, 0x67, 0x20], 0x02, 3);
    // Old carry rotates into bit 7; bit 0 (clear) becomes the carry for ADC.
    assert_eq!(cpu.bus.mem[0x0020], 0x81);
    assert_eq!(cpu.registers().a, 0x91);
    assert!(!cpu.registers().p.carry());
}

#[test]
fn isc_increments_then_subtracts() {
    // SEC; LDA #$10; ISC $20
    let cpu = run_with_zero_page(&[0x38, 0xA9, 0x10, 0xE7, 0x20], 0x04, 3);
    assert_eq!(cpu.bus.mem[0x0020], 0x05);
    assert_eq!(cpu.registers().a, 0x0B);
    assert!(cpu.registers().p.carry());
}

#[test]
fn multi_byte_nops_skip_their_operands() {
    // NOP $1234; NOP #$00
    let mut cpu = run_program(&[0x0C, 0x34, 0x12, 0x80, 0x00], 1);
    let before = *cpu.registers();
    assert_eq!(before.pc, 0x8003);

    cpu.step().unwrap();
    assert_eq!(cpu.registers().pc, 0x8005);
    assert_eq!(cpu.registers().a, before.a);
    assert_eq!(cpu.registers().p, before.p);
    assert_eq!(cpu.bus.mem[0x1234], 0x00);
}

#[test]
fn sax_stores_a_and_x() {
    // LDA #$F0; LDX #$3C; SAX $30
    let cpu = run_program(&[0xA9, 0xF0, 0xA2, 0x3C, 0x87, 0x30], 3);
    assert_eq!(cpu.bus.mem[0x0030], 0x30);
}

#[test]
fn unknown_opcode_halts_without_touching_registers() {
    // LDA #$42; JAM
    let mut cpu = run_program(&[0xA9, 0x42, 0x02], 1);
    let before = *cpu.registers();

    let halted = StepResult::Halted(DecodeError::UnknownOpcode { opcode: 0x02 });
    assert_eq!(cpu.step().unwrap(), halted);
    assert_eq!(*cpu.registers(), before);
    assert_eq!(
        cpu.state(),
        RunState::Halted(DecodeError::UnknownOpcode { opcode: 0x02 })
    );

    // Stays halted.
    assert_eq!(cpu.step().unwrap(), halted);
    assert_eq!(cpu.executed_instructions(), 1);
}

#[test]
fn fetch_past_top_of_memory_is_truncated() {
    let mut bus = TestBus::new();
    bus.mem[0xFFFC] = 0xFF;
    bus.mem[0xFFFD] = 0xFF;
    bus.mem[0xFFFF] = 0xAD; // LDA abs with only one byte left

    let mut cpu = powered_cpu(bus);
    assert_eq!(
        cpu.step().unwrap(),
        StepResult::Halted(DecodeError::TruncatedBuffer {
            opcode: 0xAD,
            needed: 3,
            available: 1,
        })
    );
}

#[test]
fn run_stops_at_halt() {
    let mut bus = TestBus::new();
    bus.load(0x8000, &[0xE8, 0xE8, 0xE8, 0x12]); // INX x3; JAM
    let mut cpu = powered_cpu(bus);

    let outcome = cpu.run(None).unwrap();

    assert_eq!(
        outcome,
        RunOutcome::Halted(DecodeError::UnknownOpcode { opcode: 0x12 })
    );
    assert_eq!(cpu.registers().x, 3);
    assert_eq!(cpu.executed_instructions(), 3);
}

#[test]
fn run_honours_instruction_limit() {
    let mut cpu = run_program(&[0xA2, 0x01, 0xD0, 0xFE], 0); // LDX #1; BNE -2
    assert_eq!(cpu.run(Some(100)).unwrap(), RunOutcome::LimitReached);
    assert_eq!(cpu.executed_instructions(), 100);
    assert_eq!(cpu.state(), RunState::Running);
}

#[test]
fn reset_resumes_a_halted_cpu() {
    let mut cpu = run_program(&[0x02], 0);
    assert!(matches!(cpu.step().unwrap(), StepResult::Halted(_)));

    cpu.bus.mem[0x8000] = 0xEA;
    cpu.reset().unwrap();

    assert_eq!(cpu.state(), RunState::Running);
    assert_eq!(cpu.step().unwrap(), StepResult::Continue);
}
