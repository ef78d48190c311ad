use phf::{Map, phf_map};

/// Atomic number and standard atomic weight of a chemical element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    pub symbol: &'static str,
    pub atomic_number: u8,
    /// Standard atomic weight in unified atomic mass units (u).
    pub mass: f64,
}

const fn element(symbol: &'static str, atomic_number: u8, mass: f64) -> Element {
    Element {
        symbol,
        atomic_number,
        mass,
    }
}

static ELEMENTS: Map<&'static str, Element> = phf_map! {
    "H" => element("H", 1, 1.008),
    "He" => element("He", 2, 4.002602),
    "Li" => element("Li", 3, 6.94),
    "Be" => element("Be", 4, 9.0121831),
    "B" => element("B", 5, 10.81),
    "C" => element("C", 6, 12.011),
    "N" => element("N", 7, 14.007),
    "O" => element("O", 8, 15.999),
    "F" => element("F", 9, 18.998403163),
    "Ne" => element("Ne", 10, 20.1797),
    "Na" => element("Na", 11, 22.98976928),
    "Mg" => element("Mg", 12, 24.305),
    "Al" => element("Al", 13, 26.9815385),
    "Si" => element("Si", 14, 28.085),
    "P" => element("P", 15, 30.973761998),
    "S" => element("S", 16, 32.06),
    "Cl" => element("Cl", 17, 35.45),
    "Ar" => element("Ar", 18, 39.948),
    "K" => element("K", 19, 39.0983),
    "Ca" => element("Ca", 20, 40.078),
    "Sc" => element("Sc", 21, 44.955908),
    "Ti" => element("Ti", 22, 47.867),
    "V" => element("V", 23, 50.9415),
    "Cr" => element("Cr", 24, 51.9961),
    "Mn" => element("Mn", 25, 54.938044),
    "Fe" => element("Fe", 26, 55.845),
    "Co" => element("Co", 27, 58.933194),
    "Ni" => element("Ni", 28, 58.6934),
    "Cu" => element("Cu", 29, 63.546),
    "Zn" => element("Zn", 30, 65.38),
    "Ga" => element("Ga", 31, 69.723),
    "Ge" => element("Ge", 32, 72.630),
    "As" => element("As", 33, 74.921595),
    "Se" => element("Se", 34, 78.971),
    "Br" => element("Br", 35, 79.904),
    "Kr" => element("Kr", 36, 83.798),
    "Rb" => element("Rb", 37, 85.4678),
    "Sr" => element("Sr", 38, 87.62),
    "Y" => element("Y", 39, 88.90584),
    "Zr" => element("Zr", 40, 91.224),
    "Nb" => element("Nb", 41, 92.90637),
    "Mo" => element("Mo", 42, 95.95),
    "Tc" => element("Tc", 43, 97.90721),
    "Ru" => element("Ru", 44, 101.07),
    "Rh" => element("Rh", 45, 102.9055),
    "Pd" => element("Pd", 46, 106.42),
    "Ag" => element("Ag", 47, 107.8682),
    "Cd" => element("Cd", 48, 112.414),
    "In" => element("In", 49, 114.818),
    "Sn" => element("Sn", 50, 118.71),
    "Sb" => element("Sb", 51, 121.76),
    "Te" => element("Te", 52, 127.6),
    "I" => element("I", 53, 126.90447),
    "Xe" => element("Xe", 54, 131.293),
    "Cs" => element("Cs", 55, 132.90545196),
    "Ba" => element("Ba", 56, 137.327),
    "La" => element("La", 57, 138.90547),
    "Ce" => element("Ce", 58, 140.116),
    "Pr" => element("Pr", 59, 140.90766),
    "Nd" => element("Nd", 60, 144.242),
    "Pm" => element("Pm", 61, 144.91276),
    "Sm" => element("Sm", 62, 150.36),
    "Eu" => element("Eu", 63, 151.964),
    "Gd" => element("Gd", 64, 157.25),
    "Tb" => element("Tb", 65, 158.92535),
    "Dy" => element("Dy", 66, 162.5),
    "Ho" => element("Ho", 67, 164.93033),
    "Er" => element("Er", 68, 167.259),
    "Tm" => element("Tm", 69, 168.93422),
    "Yb" => element("Yb", 70, 173.054),
    "Lu" => element("Lu", 71, 174.9668),
    "Hf" => element("Hf", 72, 178.49),
    "Ta" => element("Ta", 73, 180.94788),
    "W" => element("W", 74, 183.84),
    "Re" => element("Re", 75, 186.207),
    "Os" => element("Os", 76, 190.23),
    "Ir" => element("Ir", 77, 192.217),
    "Pt" => element("Pt", 78, 195.084),
    "Au" => element("Au", 79, 196.966569),
    "Hg" => element("Hg", 80, 200.592),
    "Tl" => element("Tl", 81, 204.38),
    "Pb" => element("Pb", 82, 207.2),
    "Bi" => element("Bi", 83, 208.9804),
    "Po" => element("Po", 84, 208.98243),
    "At" => element("At", 85, 209.98715),
    "Rn" => element("Rn", 86, 222.01758),
    "Fr" => element("Fr", 87, 223.01974),
    "Ra" => element("Ra", 88, 226.02541),
    "Ac" => element("Ac", 89, 227.02775),
    "Th" => element("Th", 90, 232.0377),
    "Pa" => element("Pa", 91, 231.03588),
    "U" => element("U", 92, 238.02891),
    "Np" => element("Np", 93, 237.04817),
    "Pu" => element("Pu", 94, 244.06421),
    "Am" => element("Am", 95, 243.06138),
    "Cm" => element("Cm", 96, 247.07035),
    "Bk" => element("Bk", 97, 247.07031),
    "Cf" => element("Cf", 98, 251.07959),
    "Es" => element("Es", 99, 252.083),
    "Fm" => element("Fm", 100, 257.09511),
    "Md" => element("Md", 101, 258.09843),
    "No" => element("No", 102, 259.101),
    "Lr" => element("Lr", 103, 262.11),
    "Rf" => element("Rf", 104, 267.122),
    "Db" => element("Db", 105, 268.126),
    "Sg" => element("Sg", 106, 271.134),
    "Bh" => element("Bh", 107, 270.133),
    "Hs" => element("Hs", 108, 269.1338),
    "Mt" => element("Mt", 109, 278.156),
    "Ds" => element("Ds", 110, 281.165),
    "Rg" => element("Rg", 111, 281.166),
    "Cn" => element("Cn", 112, 285.177),
    "Nh" => element("Nh", 113, 286.182),
    "Fl" => element("Fl", 114, 289.19),
    "Mc" => element("Mc", 115, 289.194),
    "Lv" => element("Lv", 116, 293.204),
    "Ts" => element("Ts", 117, 293.208),
    "Og" => element("Og", 118, 294.214),
};

/// Looks up an element by its (case-sensitive) chemical symbol.
pub fn lookup(symbol: &str) -> Option<&'static Element> {
    ELEMENTS.get(symbol)
}

/// Returns the standard atomic weight for `symbol`, if the element is known.
pub fn atomic_mass(symbol: &str) -> Option<f64> {
    lookup(symbol).map(|e| e.mass)
}

pub fn atomic_number(symbol: &str) -> Option<u8> {
    lookup(symbol).map(|e| e.atomic_number)
}
