use aq6370d::{
    instruments::aq6370d::{
        Analyzer, Trace, ALL_TRACES, LEVEL_POSITION, REFERENCE_LEVEL, RESOLUTION_BANDWIDTH,
        SWEEP_MODE, SWEEP_SPEED, SWEEP_TIME_INTERVAL, WAVELENGTH_CENTER, WAVELENGTH_SPAN,
        WAVELENGTH_START, WAVELENGTH_STOP,
    },
    protocols::Loopback,
    Error, Scpi,
};

fn analyzer(responses: &[&str]) -> Analyzer<Loopback> {
    Analyzer::new(Loopback::with_responses(responses.iter().copied()))
}

fn written(osa: Analyzer<Loopback>) -> Vec<String> {
    osa.into_inner().take_written()
}

#[test]
fn direct_commands() {
    let mut osa = analyzer(&[]);
    osa.abort().unwrap();
    osa.initiate().unwrap();
    osa.level_position_max().unwrap();
    osa.copy_trace("TRA", "TRC").unwrap();
    osa.copy_trace(Trace::B, Trace::G).unwrap();
    osa.delete_trace(ALL_TRACES).unwrap();
    osa.delete_trace("TRB").unwrap();
    osa.delete_trace(Trace::D).unwrap();
    assert_eq!(
        written(osa),
        [
            ":ABORt",
            ":INITiate:IMMediate",
            ":CALCulate:MARKer:MAXimum:SRLevel",
            ":TRACe:COPY TRA,TRC",
            ":TRACe:COPY TRB,TRG",
            ":TRACe:DELete:ALL",
            ":TRACe:DELete TRB",
            ":TRACe:DELete TRD",
        ]
    );
}

#[test]
fn trace_identifiers_are_not_checked_locally() {
    let mut osa = analyzer(&[]);
    osa.copy_trace("TRX", "").unwrap();
    osa.delete_trace("all").unwrap();
    assert_eq!(written(osa), [":TRACe:COPY TRX,", ":TRACe:DELete all"]);
}

#[test]
fn trace_data() {
    let mut osa = analyzer(&[
        "+1.54990000E-006,+1.55000000E-006,+1.55010000E-006",
        "-65.120,-12.500,-64.980",
        "+1.54990000E-006,+1.55000000E-006",
        "-65.120,-12.500",
    ]);
    assert_eq!(osa.get_xdata("TRA").unwrap(), vec![1.5499e-6, 1.55e-6, 1.5501e-6]);
    assert_eq!(osa.get_ydata(Trace::A).unwrap(), vec![-65.12, -12.5, -64.98]);
    let points = osa.get_trace("TRC").unwrap();
    assert_eq!(points, vec![(1.5499e-6, -65.12), (1.55e-6, -12.5)]);
    assert_eq!(
        written(osa),
        [":TRACe:X? TRA", ":TRACe:Y? TRA", ":TRACe:X? TRC", ":TRACe:Y? TRC"]
    );
}

#[test]
fn mismatched_trace_axes_fail() {
    let mut osa = analyzer(&["1,2,3", "4,5"]);
    assert!(matches!(osa.get_trace("TRA"), Err(Error::ParseError { .. })));
}

#[test]
fn empty_trace_is_empty() {
    let mut osa = analyzer(&[""]);
    assert!(osa.get_xdata("TRE").unwrap().is_empty());
}

#[test]
fn sweep_mode_round_trip() {
    let mut osa = analyzer(&["2"]);
    osa.set_sweep_mode("REPEAT").unwrap();
    assert_eq!(osa.sweep_mode().unwrap(), "REPEAT");
    assert_eq!(written(osa), [":INITiate:SMODe 2", ":INITiate:SMODe?"]);
}

#[test]
fn sweep_speed_uses_its_own_query() {
    let mut osa = analyzer(&["1"]);
    osa.set_sweep_speed("1x").unwrap();
    assert_eq!(osa.sweep_speed().unwrap(), "2x");
    assert_eq!(written(osa), [":SENSe:SWEep:SPEed 0", ":SENSe:SETTing:SPEed?"]);
}

#[test]
fn mapped_controls_reject_unknown_keys() {
    let mut osa = analyzer(&[]);
    for result in [
        osa.set_sweep_mode("CONTINUOUS"),
        osa.set_sweep_mode("2"),
        osa.set_sweep_speed("4x"),
    ] {
        assert!(matches!(result, Err(Error::InvalidChoiceError { .. })));
    }
    assert!(written(osa).is_empty());
}

#[test]
fn unmapped_response_is_a_mapping_error() {
    let mut osa = analyzer(&["9", "FAST"]);
    assert!(matches!(osa.sweep_mode(), Err(Error::MappingError { .. })));
    assert!(matches!(osa.sweep_speed(), Err(Error::MappingError { .. })));
}

#[test]
fn wavelength_center() {
    let mut osa = analyzer(&["+1.55000000E-006"]);
    osa.set_wavelength_center(1550e-9).unwrap();
    let err = osa.set_wavelength_center(3000e-9).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(err.to_string(), "value 3e-06 is out of range [5e-08, 2.25e-06]");
    assert_eq!(osa.wavelength_center().unwrap(), 1550e-9);
    assert_eq!(
        written(osa),
        [":SENSe:WAVelength:CENTer 1.55e-06", ":SENSe:WAVelength:CENTer?"]
    );
}

#[test]
fn float_range_controls_at_their_bounds() {
    let controls = [
        (REFERENCE_LEVEL, -100.0, 20.0),
        (WAVELENGTH_CENTER, 50e-9, 2250e-9),
        (WAVELENGTH_SPAN, 0.0, 1100e-9),
        (WAVELENGTH_START, 50e-9, 2250e-9),
        (WAVELENGTH_STOP, 50e-9, 2250e-9),
        (RESOLUTION_BANDWIDTH, 0.02e-9, 2e-9),
    ];
    for (control, min, max) in controls {
        let mut link = Loopback::new();
        control.set(&mut link, min).unwrap();
        control.set(&mut link, max).unwrap();
        for outside in [min - (max - min) * 0.01, max * 1.01 + 1e-12] {
            assert!(
                matches!(control.set(&mut link, outside), Err(Error::RangeError { .. })),
                "{} accepted {}",
                control.name(),
                outside
            );
        }
        let expected_prefix = control.set_command().trim_end_matches("%g");
        assert_eq!(link.written().len(), 2, "{}", control.name());
        assert!(link.written().iter().all(|c| c.starts_with(expected_prefix)));
    }
}

#[test]
fn integer_range_controls() {
    let mut osa = analyzer(&["+1.00000000E+001", "600"]);
    osa.set_level_position(12).unwrap();
    osa.set_sweep_time_interval(0).unwrap();
    osa.set_sweep_time_interval(99999).unwrap();
    assert!(osa.set_level_position(13).is_err());
    assert!(osa.set_level_position(-1).is_err());
    assert!(osa.set_sweep_time_interval(100000).is_err());
    assert_eq!(osa.level_position().unwrap(), 10);
    assert_eq!(osa.sweep_time_interval().unwrap(), 600);
    assert_eq!(
        written(osa),
        [
            ":DISPlay:TRACe:Y1:RPOSition 12",
            ":SENSe:SWEep:TIME:INTerval 0",
            ":SENSe:SWEep:TIME:INTerval 99999",
            ":DISPlay:TRACe:Y1:RPOSition?",
            ":SENSe:SWEep:TIME:INTerval?",
        ]
    );
    assert_eq!(LEVEL_POSITION.command(7).unwrap(), ":DISPlay:TRACe:Y1:RPOSition 7");
    assert_eq!(
        SWEEP_TIME_INTERVAL.command(99999).unwrap(),
        ":SENSe:SWEep:TIME:INTerval 99999"
    );
}

#[test]
fn leveling_and_resolution() {
    let mut osa = analyzer(&["-2.00000000E+001", "+5.0000E-011"]);
    osa.set_reference_level(-20.0).unwrap();
    osa.set_resolution_bandwidth(0.1e-9).unwrap();
    assert_eq!(osa.reference_level().unwrap(), -20.0);
    assert_eq!(osa.resolution_bandwidth().unwrap(), 0.05e-9);
    assert_eq!(
        written(osa),
        [
            ":DISPlay:TRACe:Y1:SCALe:RLEVel -20",
            ":SENSe:BWIDth:RESolution 1e-10",
            ":DISPlay:TRACe:Y1:SCALe:RLEVel?",
            ":SENSe:BWIDth:RESolution?",
        ]
    );
}

#[test]
fn active_trace() {
    let mut osa = analyzer(&["TRC"]);
    osa.set_active_trace(Trace::B).unwrap();
    assert_eq!(osa.active_trace().unwrap(), Trace::C);
    assert_eq!(written(osa), [":TRACe:ACTive TRB", ":TRACe:ACTive?"]);
}

#[test]
fn mapped_commands_carry_codes_not_keys() {
    for key in SWEEP_MODE.map().keys() {
        let command = SWEEP_MODE.command(key).unwrap();
        assert!(!command.contains(key), "{}", command);
    }
    assert_eq!(SWEEP_MODE.command("SEGMENT").unwrap(), ":INITiate:SMODe 4");
    assert_eq!(SWEEP_SPEED.command("2x").unwrap(), ":SENSe:SWEep:SPEed 1");
}

#[test]
fn single_sweep_waits_for_completion() {
    let mut osa = analyzer(&["1"]);
    osa.single_sweep().unwrap();
    assert_eq!(
        written(osa),
        [":INITiate:SMODe 1", ":INITiate:IMMediate", "*OPC?"]
    );
}

#[test]
fn borrowed_connection() {
    let mut link = Loopback::with_responses(["YOKOGAWA,AQ6370D,0,01.00", "0,\"No error\""]);
    {
        let mut osa = Analyzer::new(&mut link);
        assert!(osa.id().unwrap().starts_with("YOKOGAWA"));
        osa.initiate().unwrap();
        osa.check_errors().unwrap();
    }
    assert_eq!(
        link.written(),
        ["*IDN?", ":INITiate:IMMediate", ":SYSTem:ERRor?"]
    );
}

#[test]
fn device_errors_propagate_from_the_connection() {
    let mut osa = analyzer(&["-222,\"Data out of range\"", "0,\"No error\""]);
    osa.copy_trace("TRA", "TRZ").unwrap();
    match osa.check_errors() {
        Err(Error::DeviceError(e)) => assert_eq!(e.code(), -222),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn missing_response_is_an_io_error() {
    let mut osa = analyzer(&[]);
    assert!(matches!(osa.wavelength_span(), Err(Error::IOError(_))));
}
